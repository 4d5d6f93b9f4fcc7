use super::OutputHandler;
use crate::error::Result;
use crate::store::DashboardSnapshot;
use crate::timeline::{self, Timeline};
use async_trait::async_trait;
use std::path::PathBuf;

/// Keeps a CSV export of the aligned response-time chart.
///
/// The file is rewritten on every snapshot so it always matches the latest
/// window. Gaps are empty cells.
pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn write_timeline(&self, timeline: &Timeline) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)?;

        let mut header = vec![crate::timeline::TIME_KEY.to_string(), "timestamp".to_string()];
        header.extend(timeline.headers());
        writer.write_record(&header)?;

        for row in &timeline.rows {
            let mut record = vec![row.label.clone(), row.timestamp.to_rfc3339()];
            record.extend(
                row.values
                    .iter()
                    .map(|v| v.map(|ms| ms.to_string()).unwrap_or_default()),
            );
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl OutputHandler for CsvOutput {
    async fn write(&mut self, snapshot: &DashboardSnapshot) -> Result<()> {
        self.write_timeline(&timeline::align(&snapshot.consolidated))
    }
}
