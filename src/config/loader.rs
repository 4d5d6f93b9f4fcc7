use crate::config::schema::{self, DashboardConfig};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

pub const ENV_PREFIX: &str = "DASHBOARD";

/// Values taken from `DASHBOARD_*` environment variables.
#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    api_base: Option<String>,
    refresh_interval_secs: Option<u64>,
    repoll_delay_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    period_hours: Option<u32>,
    history_limit: Option<u32>,
    user_agent: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the file (following `extends`), applies environment overrides and
    /// validates the result.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DashboardConfig> {
        let config = Self::load_file_chain(path.as_ref())?;
        Self::finish(config, Self::environment())
    }

    /// Like [`ConfigLoader::load`], falling back to defaults when no file is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<DashboardConfig> {
        match path {
            Some(path) => Self::load(path),
            None => Self::finish(DashboardConfig::default(), Self::environment()),
        }
    }

    /// Loads the file chain only: no environment, no validation.
    pub fn load_file_chain(path: &Path) -> Result<DashboardConfig> {
        let mut visited = HashSet::new();
        Self::load_with_inheritance(path, &mut visited)
    }

    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
    }

    /// Applies overrides from `env` and validates.
    pub fn finish(config: DashboardConfig, env: config::Environment) -> Result<DashboardConfig> {
        let config = Self::apply_env(config, env)?;
        config.validate()?;
        Ok(config)
    }

    fn load_with_inheritance(
        path: &Path,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<DashboardConfig> {
        let path = fs::canonicalize(path).map_err(|e| {
            Error::Config(format!("{}: {}", path.display(), e))
        })?;

        if visited.contains(&path) {
            return Err(Error::Config(format!(
                "Circular inheritance detected involving {}",
                path.display()
            )));
        }
        visited.insert(path.clone());

        let config = Self::load_file(&path)?;

        if let Some(parent_path_str) = &config.extends {
            let parent_path = path.parent()
                .ok_or_else(|| Error::Config(format!(
                    "Cannot determine parent directory for {}",
                    path.display()
                )))?
                .join(parent_path_str);

            let parent_config = Self::load_with_inheritance(&parent_path, visited)?;
            Ok(Self::merge_configs(parent_config, config))
        } else {
            Ok(config)
        }
    }

    fn load_file(path: &Path) -> Result<DashboardConfig> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err(Error::Config(format!(
                "Unsupported file extension: {}",
                path.display()
            ))),
        }
    }

    /// Child values win unless they are still at their defaults.
    fn merge_configs(mut parent: DashboardConfig, child: DashboardConfig) -> DashboardConfig {
        if child.api_base != schema::default_api_base() {
            parent.api_base = child.api_base;
        }
        if child.refresh_interval_secs != schema::default_refresh_interval() {
            parent.refresh_interval_secs = child.refresh_interval_secs;
        }
        if child.repoll_delay_secs != schema::default_repoll_delay() {
            parent.repoll_delay_secs = child.repoll_delay_secs;
        }
        if child.request_timeout_secs != schema::default_request_timeout() {
            parent.request_timeout_secs = child.request_timeout_secs;
        }
        if child.period_hours != schema::default_period_hours() {
            parent.period_hours = child.period_hours;
        }
        if child.history_limit.is_some() {
            parent.history_limit = child.history_limit;
        }
        if child.user_agent != schema::default_user_agent() {
            parent.user_agent = child.user_agent;
        }
        if child.output.is_some() {
            parent.output = child.output;
        }

        parent.extends = None;
        parent
    }

    fn apply_env(mut config: DashboardConfig, env: config::Environment) -> Result<DashboardConfig> {
        let overrides: EnvOverrides = config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;

        if let Some(api_base) = overrides.api_base {
            log::debug!("api_base overridden from environment");
            config.api_base = api_base;
        }
        if let Some(secs) = overrides.refresh_interval_secs {
            config.refresh_interval_secs = secs;
        }
        if let Some(secs) = overrides.repoll_delay_secs {
            config.repoll_delay_secs = secs;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(hours) = overrides.period_hours {
            config.period_hours = hours;
        }
        if overrides.history_limit.is_some() {
            config.history_limit = overrides.history_limit;
        }
        if let Some(user_agent) = overrides.user_agent {
            config.user_agent = user_agent;
        }
        Ok(config)
    }
}
