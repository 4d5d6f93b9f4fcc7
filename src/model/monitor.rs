use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of the most recent probe of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CheckStatus {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Online => "online",
            CheckStatus::Offline => "offline",
            CheckStatus::Unknown => "unknown",
        }
    }
}

impl From<String> for CheckStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "online" => CheckStatus::Online,
            // The prober records failed requests as "error".
            "offline" | "error" => CheckStatus::Offline,
            _ => CheckStatus::Unknown,
        }
    }
}

impl From<CheckStatus> for String {
    fn from(status: CheckStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub id: u64,
    #[serde(default)]
    pub url_id: Option<u64>,
    #[serde(default)]
    pub status: CheckStatus,
    #[serde(default, rename = "response_time")]
    pub response_time_seconds: Option<f64>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default, deserialize_with = "super::time::deserialize_option")]
    pub checked_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoredUrl {
    pub id: u64,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub latest_check: Option<Check>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "super::time::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregate counters, recomputed server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    #[serde(deserialize_with = "super::de::default_on_null")]
    pub total_urls: u64,
    #[serde(alias = "online_urls", deserialize_with = "super::de::default_on_null")]
    pub online_count: u64,
    #[serde(alias = "offline_urls", deserialize_with = "super::de::default_on_null")]
    pub offline_count: u64,
    #[serde(alias = "total_checks_24h", deserialize_with = "super::de::default_on_null")]
    pub checks_last_24h: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(deserialize_with = "super::time::deserialize")]
    pub timestamp: DateTime<Utc>,
    /// Milliseconds, as the overview endpoint reports them. `None` is a gap.
    #[serde(default, rename = "response_time")]
    pub response_time_ms: Option<f64>,
}

/// Response-time samples of one URL within a lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedSeries {
    pub url_id: u64,
    pub url_name: String,
    pub data_points: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub url_id: u64,
    pub url_name: String,
    #[serde(default, deserialize_with = "super::de::default_on_null")]
    pub total_checks: u64,
    #[serde(default, deserialize_with = "super::de::default_on_null")]
    pub online_checks: u64,
    #[serde(default, deserialize_with = "super::de::default_on_null")]
    pub uptime_percentage: f64,
    #[serde(default, rename = "avg_response_time", deserialize_with = "super::de::default_on_null")]
    pub avg_response_time_seconds: f64,
    #[serde(default, rename = "min_response_time", deserialize_with = "super::de::default_on_null")]
    pub min_response_time_seconds: f64,
    #[serde(default, rename = "max_response_time", deserialize_with = "super::de::default_on_null")]
    pub max_response_time_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn check_status_maps_backend_strings() {
        assert_eq!(CheckStatus::from("online".to_string()), CheckStatus::Online);
        assert_eq!(CheckStatus::from("error".to_string()), CheckStatus::Offline);
        assert_eq!(CheckStatus::from("pending".to_string()), CheckStatus::Unknown);
    }

    #[test]
    fn url_without_checks_decodes() {
        let url: MonitoredUrl = serde_json::from_value(json!({
            "id": 3,
            "name": "Shop",
            "url": "https://shop.example",
            "latest_check": null
        }))
        .unwrap();
        assert!(url.latest_check.is_none());
        assert!(url.created_at.is_none());
    }

    #[test]
    fn stats_accepts_either_field_spelling() {
        let a: Stats = serde_json::from_value(json!({
            "total_urls": 4, "online_urls": 3, "offline_urls": 1, "checks_last_24h": 90
        }))
        .unwrap();
        let b: Stats = serde_json::from_value(json!({
            "total_urls": 4, "online_count": 3, "offline_count": 1, "total_checks_24h": 90
        }))
        .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.checks_last_24h, 90);
    }

    #[test]
    fn stats_missing_fields_are_zero() {
        let stats: Stats = serde_json::from_value(json!({ "total_urls": 2 })).unwrap();
        assert_eq!(stats.online_count, 0);
        assert_eq!(stats.offline_count, 0);
    }

    #[test]
    fn summary_counters_default_to_zero() {
        let summary: PerformanceSummary = serde_json::from_value(json!({
            "url_id": 1,
            "url_name": "A",
            "total_checks": 0,
            "avg_response_time": null
        }))
        .unwrap();
        assert_eq!(summary.uptime_percentage, 0.0);
        assert_eq!(summary.avg_response_time_seconds, 0.0);
        assert_eq!(summary.online_checks, 0);
    }

    #[test]
    fn summary_requires_its_identity() {
        let summary = json!({ "url_id": 1, "total_checks": 3, "uptime_percentage": 100.0 });
        assert!(serde_json::from_value::<PerformanceSummary>(summary).is_err());
    }
}
