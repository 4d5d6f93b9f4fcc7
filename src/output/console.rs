use super::OutputHandler;
use crate::error::{Error, Result};
use crate::model::{Check, CheckStatus, ResultStatus, StepStatus, SyntheticStatus};
use crate::store::DashboardSnapshot;
use crate::timeline::{self, Timeline};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indicatif::MultiProgress;
use std::fmt::Write;
use std::sync::Arc;

/// Rows of the combined chart shown on the console; older rows are elided.
const TIMELINE_TAIL: usize = 10;

pub struct ConsoleOutput {
    multi: Option<Arc<MultiProgress>>,
}

impl ConsoleOutput {
    pub fn new(multi: Option<Arc<MultiProgress>>) -> Self {
        Self { multi }
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl OutputHandler for ConsoleOutput {
    async fn write(&mut self, snapshot: &DashboardSnapshot) -> Result<()> {
        let output = render(snapshot);

        if let Some(multi) = &self.multi {
            for line in output.lines() {
                multi.println(line).map_err(|e| Error::Internal(e.to_string()))?;
            }
        } else {
            for line in output.lines() {
                println!("{}", line);
            }
        }
        Ok(())
    }
}

pub fn format_response_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s > 0.0 => format!("{:.0}ms", s * 1000.0),
        _ => "N/A".to_string(),
    }
}

pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Never".to_string())
}

pub fn check_badge(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Online => "ONLINE",
        CheckStatus::Offline => "OFFLINE",
        CheckStatus::Unknown => "UNKNOWN",
    }
}

fn synthetic_badge(status: Option<SyntheticStatus>) -> &'static str {
    match status {
        Some(SyntheticStatus::Success) => "SUCCESS",
        Some(SyntheticStatus::Failed) => "FAILED",
        Some(SyntheticStatus::Unknown) | None => "UNKNOWN",
    }
}

fn result_badge(status: ResultStatus) -> &'static str {
    match status {
        ResultStatus::Success => "SUCCESS",
        ResultStatus::Failed => "FAILED",
        ResultStatus::Partial => "PARTIAL",
    }
}

fn step_badge(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Success => "ok",
        StepStatus::Failed => "FAILED",
    }
}

/// Full dashboard as plain text.
pub fn render(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&render_urls(snapshot));
    out.push_str(&render_overview(snapshot));
    out.push_str(&render_synthetic(snapshot));
    if snapshot.selection.selected_url_id.is_some() {
        out.push_str(&render_history(snapshot));
    }
    out
}

pub fn render_urls(snapshot: &DashboardSnapshot) -> String {
    let stats = &snapshot.stats;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "URLs: {} | Online: {} | Offline: {} | Checks (24h): {}",
        stats.total_urls, stats.online_count, stats.offline_count, stats.checks_last_24h
    );
    if snapshot.urls.is_empty() {
        let _ = writeln!(out, "  (no monitored URLs)");
    }
    for url in &snapshot.urls {
        let check = url.latest_check.as_ref();
        let _ = writeln!(
            out,
            "  [{:>3}] {:<8} {:<30} {:>8}  {}  {}  {}",
            url.id,
            check.map(|c| check_badge(c.status)).unwrap_or("-"),
            url.name,
            format_response_time(check.and_then(|c| c.response_time_seconds)),
            check
                .and_then(|c| c.status_code)
                .map(|code| code.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            format_date(check.and_then(|c| c.checked_at)),
            url.url
        );
    }
    out
}

/// Performance summaries plus the tail of the aligned chart for the current window.
pub fn render_overview(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Overview (last {}h)", snapshot.selection.period_hours);

    if snapshot.performance.is_empty() {
        let _ = writeln!(out, "  (no performance data)");
    }
    for summary in &snapshot.performance {
        let _ = writeln!(
            out,
            "  {:<30} uptime {:>5.1}%  avg {:>6}  min {:>6}  max {:>6}  ({} checks)",
            summary.url_name,
            summary.uptime_percentage,
            format!("{:.0}ms", summary.avg_response_time_seconds * 1000.0),
            format!("{:.0}ms", summary.min_response_time_seconds * 1000.0),
            format!("{:.0}ms", summary.max_response_time_seconds * 1000.0),
            summary.total_checks
        );
    }

    out.push_str(&render_timeline(&timeline::align(&snapshot.consolidated)));
    out
}

pub fn render_timeline(timeline: &Timeline) -> String {
    let mut out = String::new();
    if timeline.is_empty() {
        return out;
    }
    let _ = writeln!(out, "  time      {}", timeline.headers().join(" | "));
    let skip = timeline.rows.len().saturating_sub(TIMELINE_TAIL);
    for row in &timeline.rows[skip..] {
        let cells: Vec<String> = row
            .values
            .iter()
            .map(|v| match v {
                Some(ms) => format!("{:.0}ms", ms),
                None => "-".to_string(),
            })
            .collect();
        let _ = writeln!(out, "  {}  {}", row.label, cells.join(" | "));
    }
    out
}

pub fn render_synthetic(snapshot: &DashboardSnapshot) -> String {
    let stats = &snapshot.synthetic_stats;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Synthetic tests: {} | Success rate: {:.1}% | Runs (24h): {} | Avg duration: {:.0}s",
        stats.total_tests, stats.success_rate, stats.executions_24h, stats.avg_duration
    );
    for test in &snapshot.synthetic_tests {
        let _ = writeln!(
            out,
            "  [{:>3}] {:<8} {:<30} {:>7}  {}  {}",
            test.id,
            synthetic_badge(test.latest_status),
            test.test_name,
            test.latest_duration
                .map(|d| format!("{:.1}s", d))
                .unwrap_or_else(|| "N/A".to_string()),
            format_date(test.latest_execution),
            test.site_url
        );
    }

    if let Some(test_id) = snapshot.selection.selected_test_id {
        let _ = writeln!(out, "Results for test {}", test_id);
        if snapshot.test_results.is_empty() {
            let _ = writeln!(out, "  (no results yet)");
        }
        for result in &snapshot.test_results {
            let _ = writeln!(
                out,
                "  [{:>3}] {:<8} {}/{} steps  {:.1}s  {:.1}%  {}",
                result.id,
                result_badge(result.status),
                result.steps_completed,
                result.total_steps,
                result.duration_seconds,
                result.success_rate,
                format_date(result.executed_at)
            );
        }
    }

    if let Some(result_id) = snapshot.selection.selected_result_id {
        let _ = writeln!(out, "Steps of result {}", result_id);
        for step in &snapshot.result_steps {
            let _ = write!(
                out,
                "  {:>2}. {:<6} {:<30} {:.2}s",
                step.step_order,
                step_badge(step.status),
                step.step_name,
                step.duration_seconds
            );
            match &step.error_message {
                Some(message) => {
                    let _ = writeln!(out, "  {}", message);
                }
                None => out.push('\n'),
            }
        }
    }
    out
}

pub fn render_history(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let Some(url_id) = snapshot.selection.selected_url_id else {
        return out;
    };
    let name = snapshot
        .urls
        .iter()
        .find(|u| u.id == url_id)
        .map(|u| u.name.as_str())
        .unwrap_or("?");
    let _ = writeln!(out, "History of {} [{}]", name, url_id);
    for point in timeline::history_chart(&snapshot.url_history) {
        let _ = writeln!(
            out,
            "  {:>3}  {}  {:<8} {:.0}ms",
            point.index,
            point.label,
            check_badge(point.status),
            point.response_time_ms
        );
    }
    out.push_str(&render_failures(&snapshot.url_history));
    out
}

fn render_failures(history: &[Check]) -> String {
    let mut out = String::new();
    for check in history.iter().filter(|c| c.error_message.is_some()) {
        let _ = writeln!(
            out,
            "  ! {}  {}",
            format_date(check.checked_at),
            check.error_message.as_deref().unwrap_or_default()
        );
    }
    out
}
