use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the last execution of a synthetic test, as shown in the test list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SyntheticStatus {
    Success,
    Failed,
    #[default]
    Unknown,
}

impl SyntheticStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntheticStatus::Success => "success",
            SyntheticStatus::Failed => "failed",
            SyntheticStatus::Unknown => "unknown",
        }
    }
}

impl From<String> for SyntheticStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "success" => SyntheticStatus::Success,
            "failed" | "error" | "partial" => SyntheticStatus::Failed,
            _ => SyntheticStatus::Unknown,
        }
    }
}

impl From<SyntheticStatus> for String {
    fn from(status: SyntheticStatus) -> Self {
        status.as_str().to_string()
    }
}

impl From<ResultStatus> for SyntheticStatus {
    fn from(status: ResultStatus) -> Self {
        match status {
            ResultStatus::Success => SyntheticStatus::Success,
            ResultStatus::Failed | ResultStatus::Partial => SyntheticStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResultStatus {
    Success,
    Failed,
    Partial,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Success => "success",
            ResultStatus::Failed => "failed",
            ResultStatus::Partial => "partial",
        }
    }
}

impl TryFrom<String> for ResultStatus {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.to_ascii_lowercase().as_str() {
            "success" => Ok(ResultStatus::Success),
            "failed" | "error" => Ok(ResultStatus::Failed),
            "partial" => Ok(ResultStatus::Partial),
            _ => Err(format!("unknown result status '{}'", raw)),
        }
    }
}

impl From<ResultStatus> for String {
    fn from(status: ResultStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StepStatus {
    Success,
    Failed,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Success => "success",
            StepStatus::Failed => "failed",
        }
    }
}

impl TryFrom<String> for StepStatus {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.to_ascii_lowercase().as_str() {
            "success" => Ok(StepStatus::Success),
            "failed" | "error" => Ok(StepStatus::Failed),
            _ => Err(format!("unknown step status '{}'", raw)),
        }
    }
}

impl From<StepStatus> for String {
    fn from(status: StepStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticResult {
    pub id: u64,
    pub test_id: u64,
    #[serde(default, deserialize_with = "super::time::deserialize_option")]
    pub executed_at: Option<DateTime<Utc>>,
    pub status: ResultStatus,
    #[serde(default, deserialize_with = "super::de::default_on_null")]
    pub steps_completed: u32,
    #[serde(default, deserialize_with = "super::de::default_on_null")]
    pub total_steps: u32,
    #[serde(default, alias = "duration", deserialize_with = "super::de::default_on_null")]
    pub duration_seconds: f64,
    #[serde(default, deserialize_with = "super::de::default_on_null")]
    pub success_rate: f64,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticStep {
    pub id: u64,
    pub result_id: u64,
    #[serde(alias = "step_number")]
    pub step_order: u32,
    pub step_name: String,
    pub status: StepStatus,
    #[serde(default, alias = "duration", deserialize_with = "super::de::default_on_null")]
    pub duration_seconds: f64,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A scripted multi-step flow executed against a site.
///
/// Some backend versions report the last run as flat `latest_*` fields, others
/// as a nested `latest_result` object. Both decode to the flat form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSyntheticTest")]
pub struct SyntheticTest {
    pub id: u64,
    pub test_name: String,
    pub site_url: String,
    pub latest_status: Option<SyntheticStatus>,
    pub latest_execution: Option<DateTime<Utc>>,
    pub latest_duration: Option<f64>,
}

#[derive(Deserialize)]
struct RawSyntheticTest {
    id: u64,
    test_name: String,
    site_url: String,
    #[serde(default)]
    latest_status: Option<SyntheticStatus>,
    #[serde(default, deserialize_with = "super::time::deserialize_option")]
    latest_execution: Option<DateTime<Utc>>,
    #[serde(default)]
    latest_duration: Option<f64>,
    #[serde(default)]
    latest_result: Option<SyntheticResult>,
}

impl From<RawSyntheticTest> for SyntheticTest {
    fn from(raw: RawSyntheticTest) -> Self {
        let latest = raw.latest_result;
        Self {
            id: raw.id,
            test_name: raw.test_name,
            site_url: raw.site_url,
            latest_status: raw
                .latest_status
                .or_else(|| latest.as_ref().map(|r| r.status.into())),
            latest_execution: raw
                .latest_execution
                .or_else(|| latest.as_ref().and_then(|r| r.executed_at)),
            latest_duration: raw
                .latest_duration
                .or_else(|| latest.as_ref().map(|r| r.duration_seconds)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticStats {
    #[serde(alias = "active_tests", deserialize_with = "super::de::default_on_null")]
    pub total_tests: u64,
    #[serde(deserialize_with = "super::de::default_on_null")]
    pub success_rate: f64,
    #[serde(alias = "total_executions", deserialize_with = "super::de::default_on_null")]
    pub executions_24h: u64,
    #[serde(deserialize_with = "super::de::default_on_null")]
    pub avg_duration: f64,
}
