use crate::scheduler::DEFAULT_REFRESH_INTERVAL;
use crate::store::DEFAULT_PERIOD_HOURS;
use crate::workflow::DEFAULT_REPOLL_DELAY;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    /// Base of every backend endpoint, e.g. `http://localhost:5001/api`.
    #[serde(default = "default_api_base")]
    #[validate(url)]
    pub api_base: String,

    #[serde(default = "default_refresh_interval")]
    #[validate(range(min = 1))]
    pub refresh_interval_secs: u64,

    /// Wait between starting a synthetic test and fetching its results.
    #[serde(default = "default_repoll_delay")]
    pub repoll_delay_secs: u64,

    #[serde(default = "default_request_timeout")]
    #[validate(range(min = 1))]
    pub request_timeout_secs: u64,

    /// Initial lookback window for the overview chart.
    #[serde(default = "default_period_hours")]
    #[validate(range(min = 1, max = 720))]
    pub period_hours: u32,

    #[serde(default)]
    #[validate(range(min = 1))]
    pub history_limit: Option<u32>,

    #[serde(default = "default_user_agent")]
    #[validate(length(min = 1))]
    pub user_agent: String,

    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Optional path to a parent configuration file to inherit from
    #[serde(default)]
    pub extends: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputConfig {
    Console,
    Json { path: String },
    Csv { path: String },
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            refresh_interval_secs: default_refresh_interval(),
            repoll_delay_secs: default_repoll_delay(),
            request_timeout_secs: default_request_timeout(),
            period_hours: default_period_hours(),
            history_limit: None,
            user_agent: default_user_agent(),
            output: None,
            extends: None,
        }
    }
}

impl DashboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn repoll_delay(&self) -> Duration {
        Duration::from_secs(self.repoll_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub(crate) fn default_api_base() -> String {
    "http://localhost:5001/api".to_string()
}

pub(crate) fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

pub(crate) fn default_repoll_delay() -> u64 {
    DEFAULT_REPOLL_DELAY.as_secs()
}

pub(crate) fn default_request_timeout() -> u64 {
    10
}

pub(crate) fn default_period_hours() -> u32 {
    DEFAULT_PERIOD_HOURS
}

pub(crate) fn default_user_agent() -> String {
    format!("uptime-dashboard/{}", env!("CARGO_PKG_VERSION"))
}
