pub mod de;
pub mod monitor;
pub mod synthetic;
pub mod time;

pub use monitor::{Check, CheckStatus, ConsolidatedSeries, DataPoint, MonitoredUrl, PerformanceSummary, Stats};
pub use synthetic::{
    ResultStatus, StepStatus, SyntheticResult, SyntheticStats, SyntheticStatus, SyntheticStep,
    SyntheticTest,
};
