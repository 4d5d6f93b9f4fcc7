use crate::config::OutputConfig;
use crate::error::Result;
use crate::store::DashboardSnapshot;
use async_trait::async_trait;
use indicatif::MultiProgress;
use std::path::PathBuf;
use std::sync::Arc;

pub mod console;
pub mod json;
pub mod csv;

#[async_trait]
pub trait OutputHandler: Send + Sync {
    async fn write(&mut self, snapshot: &DashboardSnapshot) -> Result<()>;
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

pub fn create_handler(
    config: Option<&OutputConfig>,
    multi: Option<Arc<MultiProgress>>,
) -> Result<Box<dyn OutputHandler>> {
    let handler: Box<dyn OutputHandler> = match config {
        Some(OutputConfig::Json { path }) => Box::new(json::JsonOutput::new(PathBuf::from(path))?),
        Some(OutputConfig::Csv { path }) => Box::new(csv::CsvOutput::new(PathBuf::from(path))),
        Some(OutputConfig::Console) | None => Box::new(console::ConsoleOutput::new(multi)),
    };
    Ok(handler)
}
