use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use uptime_dashboard::config::{ConfigLoader, DashboardConfig, OutputConfig};
use uptime_dashboard::Error;

fn env(vars: &[(&str, &str)]) -> config::Environment {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    config::Environment::with_prefix("DASHBOARD")
        .try_parsing(true)
        .source(Some(map))
}

#[test]
fn defaults_are_valid() {
    let config = ConfigLoader::finish(DashboardConfig::default(), env(&[])).unwrap();
    assert_eq!(config.api_base, "http://localhost:5001/api");
    assert_eq!(config.refresh_interval(), Duration::from_secs(30));
    assert_eq!(config.repoll_delay(), Duration::from_secs(5));
    assert_eq!(config.period_hours, 24);
    assert_eq!(config.history_limit, None);
    assert_eq!(config.output, None);
}

#[test]
fn loads_yaml_json_and_toml() {
    let dir = TempDir::new().unwrap();

    let yaml = dir.path().join("dash.yaml");
    fs::write(&yaml, "api_base: http://monitor:5001/api\nperiod_hours: 6\noutput:\n  type: csv\n  path: chart.csv\n").unwrap();
    let config = ConfigLoader::load_file_chain(&yaml).unwrap();
    assert_eq!(config.api_base, "http://monitor:5001/api");
    assert_eq!(config.period_hours, 6);
    assert_eq!(config.output, Some(OutputConfig::Csv { path: "chart.csv".into() }));

    let json = dir.path().join("dash.json");
    fs::write(&json, r#"{ "refresh_interval_secs": 10, "output": { "type": "console" } }"#).unwrap();
    let config = ConfigLoader::load_file_chain(&json).unwrap();
    assert_eq!(config.refresh_interval_secs, 10);
    assert_eq!(config.output, Some(OutputConfig::Console));

    let toml = dir.path().join("dash.toml");
    fs::write(&toml, "repoll_delay_secs = 2\nhistory_limit = 50\n").unwrap();
    let config = ConfigLoader::load_file_chain(&toml).unwrap();
    assert_eq!(config.repoll_delay_secs, 2);
    assert_eq!(config.history_limit, Some(50));
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dash.ini");
    fs::write(&path, "period_hours=6").unwrap();
    assert!(matches!(ConfigLoader::load_file_chain(&path), Err(Error::Config(_))));
}

#[test]
fn child_overrides_parent() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("base.yaml"),
        "api_base: http://prod:5001/api\nperiod_hours: 168\nhistory_limit: 20\n",
    )
    .unwrap();
    let child = dir.path().join("local.yaml");
    fs::write(&child, "extends: base.yaml\nperiod_hours: 6\n").unwrap();

    let config = ConfigLoader::load_file_chain(&child).unwrap();
    assert_eq!(config.api_base, "http://prod:5001/api");
    assert_eq!(config.period_hours, 6);
    assert_eq!(config.history_limit, Some(20));
    assert_eq!(config.extends, None);
}

#[test]
fn circular_inheritance_is_detected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.yaml"), "extends: b.yaml\n").unwrap();
    fs::write(dir.path().join("b.yaml"), "extends: a.yaml\n").unwrap();

    let err = ConfigLoader::load_file_chain(&dir.path().join("a.yaml")).unwrap_err();
    assert!(err.to_string().contains("Circular inheritance"));
}

#[test]
fn environment_overrides_file_values() {
    let config = DashboardConfig {
        period_hours: 6,
        ..DashboardConfig::default()
    };
    let config = ConfigLoader::finish(
        config,
        env(&[
            ("DASHBOARD_API_BASE", "http://staging:5001/api"),
            ("DASHBOARD_REFRESH_INTERVAL_SECS", "15"),
            ("DASHBOARD_HISTORY_LIMIT", "25"),
        ]),
    )
    .unwrap();

    assert_eq!(config.api_base, "http://staging:5001/api");
    assert_eq!(config.refresh_interval_secs, 15);
    assert_eq!(config.history_limit, Some(25));
    assert_eq!(config.period_hours, 6);
}

#[test]
fn invalid_values_fail_validation() {
    let zero_refresh = DashboardConfig {
        refresh_interval_secs: 0,
        ..DashboardConfig::default()
    };
    assert!(matches!(
        ConfigLoader::finish(zero_refresh, env(&[])),
        Err(Error::Validation(_))
    ));

    let bad_url = env(&[("DASHBOARD_API_BASE", "not a url")]);
    assert!(matches!(
        ConfigLoader::finish(DashboardConfig::default(), bad_url),
        Err(Error::Validation(_))
    ));

    let too_long = DashboardConfig {
        period_hours: 10_000,
        ..DashboardConfig::default()
    };
    assert!(ConfigLoader::finish(too_long, env(&[])).is_err());
}

#[test]
fn load_runs_the_whole_chain() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dash.toml");
    fs::write(&path, "period_hours = 0\n").unwrap();
    assert!(ConfigLoader::load(&path).is_err());

    fs::write(&path, "period_hours = 12\n").unwrap();
    let config = ConfigLoader::load(&path).unwrap();
    assert_eq!(config.period_hours, 12);
}
