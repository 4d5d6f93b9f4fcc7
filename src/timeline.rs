//! Aligns independently sampled per-URL series onto one time axis.

use crate::model::{Check, CheckStatus, ConsolidatedSeries};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

const LABEL_FORMAT: &str = "%H:%M:%S";

/// Key of the label in chart rows and the first CSV column.
pub const TIME_KEY: &str = "time";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub url_id: u64,
    pub url_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub timestamp: DateTime<Utc>,
    pub label: String,
    /// One entry per column; `None` is a gap.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub columns: Vec<Column>,
    pub rows: Vec<TimelineRow>,
}

/// Merges the series into rows keyed by the union of their timestamps.
///
/// Timestamps are deduplicated on exact equality and sorted ascending. A series
/// with no sample at a row's timestamp gets a gap there, never a zero. When a
/// series repeats a timestamp its first point is used. Columns follow the input
/// order and are identified by URL id.
pub fn align(series: &[ConsolidatedSeries]) -> Timeline {
    let width = series.len();
    // Outer `None`: no point seen yet for that cell.
    let mut grid: BTreeMap<DateTime<Utc>, Vec<Option<Option<f64>>>> = BTreeMap::new();

    for (col, s) in series.iter().enumerate() {
        for point in &s.data_points {
            let row = grid
                .entry(point.timestamp)
                .or_insert_with(|| vec![None; width]);
            // First exact match wins.
            if row[col].is_none() {
                row[col] = Some(point.response_time_ms);
            }
        }
    }

    let columns = series
        .iter()
        .map(|s| Column {
            url_id: s.url_id,
            url_name: s.url_name.clone(),
        })
        .collect();

    let rows = grid
        .into_iter()
        .map(|(timestamp, cells)| TimelineRow {
            timestamp,
            label: timestamp.format(LABEL_FORMAT).to_string(),
            values: cells.into_iter().map(Option::flatten).collect(),
        })
        .collect();

    Timeline { columns, rows }
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value(&self, row: usize, url_id: u64) -> Option<f64> {
        let col = self.columns.iter().position(|c| c.url_id == url_id)?;
        self.rows.get(row)?.values.get(col).copied().flatten()
    }

    /// Column headers for display. Names shared by several URLs, or equal to
    /// [`TIME_KEY`], get the id appended so no column hides another.
    pub fn headers(&self) -> Vec<String> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for c in &self.columns {
            *seen.entry(c.url_name.as_str()).or_default() += 1;
        }
        self.columns
            .iter()
            .map(|c| {
                let shared = seen.get(c.url_name.as_str()).copied().unwrap_or(0) > 1;
                if shared || c.url_name == TIME_KEY {
                    format!("{} (#{})", c.url_name, c.url_id)
                } else {
                    c.url_name.clone()
                }
            })
            .collect()
    }

    /// Chart rows shaped `{"time": label, <header>: value | null, ...}`.
    pub fn chart_rows(&self) -> Vec<Value> {
        let headers = self.headers();
        self.rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                obj.insert(TIME_KEY.to_string(), Value::String(row.label.clone()));
                for (header, value) in headers.iter().zip(&row.values) {
                    let cell = value
                        .and_then(serde_json::Number::from_f64)
                        .map(Value::Number)
                        .unwrap_or(Value::Null);
                    obj.insert(header.clone(), cell);
                }
                Value::Object(obj)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub index: usize,
    pub response_time_ms: f64,
    pub status: CheckStatus,
    pub label: String,
}

/// Chart points for one URL's history, which the backend returns newest first.
pub fn history_chart(history: &[Check]) -> Vec<HistoryPoint> {
    history
        .iter()
        .rev()
        .enumerate()
        .map(|(i, check)| HistoryPoint {
            index: i + 1,
            response_time_ms: check.response_time_seconds.unwrap_or(0.0) * 1000.0,
            status: check.status,
            label: check
                .checked_at
                .map(|t| t.format(LABEL_FORMAT).to_string())
                .unwrap_or_default(),
        })
        .collect()
}
