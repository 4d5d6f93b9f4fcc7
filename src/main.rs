use clap::{Parser, Subcommand};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uptime_dashboard::config::{ConfigLoader, DashboardConfig};
use uptime_dashboard::output::{self, console, csv::CsvOutput};
use uptime_dashboard::{Dashboard, NewUrl, Notice, SchedulerState};

#[derive(Parser)]
#[command(name = "uptime-dashboard")]
#[command(version = "0.1.0")]
#[command(about = "Live uptime and synthetic-test dashboard", long_about = None)]
struct Cli {
    /// Path to the configuration file (JSON/YAML/TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the backend and render the dashboard on every refresh
    Watch {
        /// Lookback window in hours for the overview chart
        #[arg(long)]
        hours: Option<u32>,

        /// Hide the refresh spinner and log straight to stderr
        #[arg(long)]
        no_progress: bool,
    },
    /// Validate a configuration file
    Check,
    /// Show performance summaries and the combined response-time chart
    Overview {
        #[arg(long, default_value_t = 24)]
        hours: u32,

        /// Also export the aligned chart to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show the check history of one URL
    History { url_id: u64 },
    /// Start monitoring a URL
    AddUrl {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
    },
    /// Stop monitoring a URL
    DeleteUrl { url_id: u64 },
    /// Probe every monitored URL now
    CheckAll,
    /// Run a synthetic test and show its results after the re-poll delay
    RunTest {
        test_id: u64,

        /// Return right after the run is accepted
        #[arg(long)]
        no_wait: bool,
    },
    /// List the results of a synthetic test
    Results { test_id: u64 },
    /// List the steps of one synthetic test result
    Steps { test_id: u64, result_id: u64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        unsafe { std::env::set_var("RUST_LOG", "info"); }
    }
    let cli = Cli::parse();
    let logger = env_logger::Builder::from_default_env().build();
    let multi = Arc::new(MultiProgress::new());

    let level = logger.filter();
    if matches!(cli.command, Commands::Watch { no_progress: false, .. }) {
        indicatif_log_bridge::LogWrapper::new((*multi).clone(), logger).try_init()?;
    } else {
        log::set_boxed_logger(Box::new(logger))?;
    }
    log::set_max_level(level);

    if let Commands::Check = cli.command {
        match ConfigLoader::load_or_default(cli.config.as_deref()) {
            Ok(cfg) => {
                println!("✅ Config is valid:");
                println!("   API base: {}", cfg.api_base);
                println!("   Refresh every: {}s", cfg.refresh_interval_secs);
                println!("   Re-poll delay: {}s", cfg.repoll_delay_secs);
                println!("   Period: {}h", cfg.period_hours);
            }
            Err(e) => {
                eprintln!("❌ Config error: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let mut config = ConfigLoader::load_or_default(cli.config.as_deref())?;
    if let Some(api_base) = cli.api_base {
        config.api_base = api_base;
    }
    if let Commands::Watch { hours: Some(hours), .. } = cli.command {
        config.period_hours = hours;
    }

    let dashboard = Dashboard::from_config(&config)?;
    let fetchers = dashboard.fetchers();
    let actions = dashboard.actions();

    match cli.command {
        Commands::Watch { no_progress, .. } => {
            watch(&dashboard, &config, (!no_progress).then(|| multi.clone())).await?;
        }
        Commands::Check => {}
        Commands::Overview { hours, csv } => {
            dashboard.store().set_period(hours);
            futures::join!(fetchers.fetch_consolidated(), fetchers.fetch_performance());
            let snapshot = dashboard.store().snapshot();
            print!("{}", console::render_overview(&snapshot));
            if let Some(path) = csv {
                CsvOutput::new(path.clone()).write_timeline(&dashboard.timeline())?;
                println!("Chart exported to {}", path.display());
            }
        }
        Commands::History { url_id } => {
            fetchers.fetch_urls().await;
            actions.open_history(url_id).await;
            print!("{}", console::render_history(&dashboard.store().snapshot()));
        }
        Commands::AddUrl { name, url } => {
            report(actions.add_url(NewUrl::new(name, url)).await);
        }
        Commands::DeleteUrl { url_id } => {
            report(actions.delete_url(url_id).await);
        }
        Commands::CheckAll => {
            let notice = dashboard.scheduler().check_all().await;
            if !notice.is_error() {
                print!("{}", console::render_urls(&dashboard.store().snapshot()));
            }
            report(notice);
        }
        Commands::RunTest { test_id, no_wait } => {
            let outcome = dashboard.workflow().execute(test_id).await;
            let failed = outcome.notice.is_error();
            println!("{}", outcome.notice);
            if let (Some(repoll), false) = (outcome.repoll, no_wait) {
                let pb = ProgressBar::new_spinner();
                pb.set_message(format!(
                    "Waiting {}s for results...",
                    config.repoll_delay_secs
                ));
                pb.enable_steady_tick(Duration::from_millis(120));
                repoll.await?;
                pb.finish_and_clear();
                print!("{}", console::render_synthetic(&dashboard.store().snapshot()));
            }
            if failed {
                std::process::exit(1);
            }
        }
        Commands::Results { test_id } => {
            fetchers.fetch_synthetic_tests().await;
            actions.open_results(test_id).await;
            print!("{}", console::render_synthetic(&dashboard.store().snapshot()));
        }
        Commands::Steps { test_id, result_id } => {
            actions.open_results(test_id).await;
            actions.open_steps(test_id, result_id).await;
            print!("{}", console::render_synthetic(&dashboard.store().snapshot()));
        }
    }

    Ok(())
}

async fn watch(
    dashboard: &Dashboard,
    config: &DashboardConfig,
    multi: Option<Arc<MultiProgress>>,
) -> anyhow::Result<()> {
    let mut handler = output::create_handler(config.output.as_ref(), multi.clone())?;
    let mut state_rx = dashboard.scheduler().watch_state();

    let spinner = multi.map(|m| {
        let pb = m.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    });

    log::info!("Watching (refresh every {}s, Ctrl-C to stop)", config.refresh_interval_secs);
    dashboard.scheduler().arm().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down...");
                break;
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *state_rx.borrow_and_update();
                match state {
                    SchedulerState::Polling => {
                        if let Some(pb) = &spinner {
                            pb.set_message("Refreshing...");
                        }
                    }
                    SchedulerState::Idle => {
                        if let Some(pb) = &spinner {
                            let now = chrono::Local::now().format("%H:%M:%S");
                            pb.set_message(format!("Last refresh {}", now));
                        }
                        handler.write(&dashboard.store().snapshot()).await?;
                    }
                }
            }
        }
    }

    dashboard.scheduler().teardown().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    handler.close().await?;
    Ok(())
}

fn report(notice: Notice) {
    if notice.is_error() {
        eprintln!("❌ {}", notice.text());
        std::process::exit(1);
    }
    println!("✅ {}", notice.text());
}
