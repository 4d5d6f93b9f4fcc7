pub mod actions;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod model;
pub mod notice;
pub mod output;
pub mod scheduler;
pub mod store;
pub mod timeline;
pub mod workflow;

pub use actions::{Actions, NewUrl};
pub use api::{Backend, HttpBackend};
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use fetch::Fetchers;
pub use notice::Notice;
pub use scheduler::{RefreshScheduler, SchedulerState};
pub use store::{DashboardSnapshot, Selection, ViewStore};
pub use timeline::{align, Timeline};
pub use workflow::{TriggerOutcome, WorkflowController, WorkflowState};
