//! Latest snapshot of every fetched resource, plus the user's selections.
//!
//! Every slice is replaced as a whole by its own update function; nothing is
//! patched in place. Selections that point at ids missing from a fresh list
//! are cleared together with the slices that depend on them.

use crate::model::{
    Check, ConsolidatedSeries, MonitoredUrl, PerformanceSummary, Stats, SyntheticResult,
    SyntheticStats, SyntheticStep, SyntheticTest,
};
use serde::Serialize;
use tokio::sync::watch;

pub const DEFAULT_PERIOD_HOURS: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub selected_url_id: Option<u64>,
    pub period_hours: u32,
    pub selected_test_id: Option<u64>,
    pub selected_result_id: Option<u64>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            selected_url_id: None,
            period_hours: DEFAULT_PERIOD_HOURS,
            selected_test_id: None,
            selected_result_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSnapshot {
    pub urls: Vec<MonitoredUrl>,
    pub stats: Stats,
    pub consolidated: Vec<ConsolidatedSeries>,
    pub performance: Vec<PerformanceSummary>,
    pub synthetic_tests: Vec<SyntheticTest>,
    pub synthetic_stats: SyntheticStats,
    pub test_results: Vec<SyntheticResult>,
    pub result_steps: Vec<SyntheticStep>,
    pub url_history: Vec<Check>,
    pub selection: Selection,
    pub loading: bool,
}

pub struct ViewStore {
    state: watch::Sender<DashboardSnapshot>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new(DEFAULT_PERIOD_HOURS)
    }
}

impl ViewStore {
    pub fn new(period_hours: u32) -> Self {
        let snapshot = DashboardSnapshot {
            selection: Selection {
                period_hours,
                ..Selection::default()
            },
            ..DashboardSnapshot::default()
        };
        let (state, _) = watch::channel(snapshot);
        Self { state }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state.borrow().clone()
    }

    /// Receives a notification after every write.
    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.state.subscribe()
    }

    pub fn period_hours(&self) -> u32 {
        self.state.borrow().selection.period_hours
    }

    pub fn selection(&self) -> Selection {
        self.state.borrow().selection.clone()
    }

    pub fn set_urls(&self, urls: Vec<MonitoredUrl>) {
        self.state.send_modify(|s| {
            if let Some(id) = s.selection.selected_url_id {
                if !urls.iter().any(|u| u.id == id) {
                    log::debug!("Selected URL {} is gone, clearing its history", id);
                    s.selection.selected_url_id = None;
                    s.url_history = Vec::new();
                }
            }
            s.urls = urls;
        });
    }

    pub fn set_stats(&self, stats: Stats) {
        self.state.send_modify(|s| s.stats = stats);
    }

    pub fn set_consolidated(&self, series: Vec<ConsolidatedSeries>) {
        self.state.send_modify(|s| s.consolidated = series);
    }

    pub fn set_performance(&self, summaries: Vec<PerformanceSummary>) {
        self.state.send_modify(|s| s.performance = summaries);
    }

    pub fn set_synthetic_tests(&self, tests: Vec<SyntheticTest>) {
        self.state.send_modify(|s| {
            if let Some(id) = s.selection.selected_test_id {
                if !tests.iter().any(|t| t.id == id) {
                    log::debug!("Selected synthetic test {} is gone, clearing its results", id);
                    s.selection.selected_test_id = None;
                    s.selection.selected_result_id = None;
                    s.test_results = Vec::new();
                    s.result_steps = Vec::new();
                }
            }
            s.synthetic_tests = tests;
        });
    }

    pub fn set_synthetic_stats(&self, stats: SyntheticStats) {
        self.state.send_modify(|s| s.synthetic_stats = stats);
    }

    /// Replaces the results list and marks `test_id` as the selected test.
    pub fn set_test_results(&self, test_id: Option<u64>, results: Vec<SyntheticResult>) {
        self.state.send_modify(|s| {
            if s.selection.selected_test_id != test_id {
                s.selection.selected_result_id = None;
                s.result_steps = Vec::new();
            }
            if let Some(id) = s.selection.selected_result_id {
                if !results.iter().any(|r| r.id == id) {
                    s.selection.selected_result_id = None;
                    s.result_steps = Vec::new();
                }
            }
            s.selection.selected_test_id = test_id;
            s.test_results = results;
        });
    }

    /// Replaces the step list, ordered by `step_order`.
    pub fn set_result_steps(&self, result_id: Option<u64>, mut steps: Vec<SyntheticStep>) {
        steps.sort_by_key(|step| step.step_order);
        self.state.send_modify(|s| {
            s.selection.selected_result_id = result_id;
            s.result_steps = steps;
        });
    }

    pub fn set_url_history(&self, url_id: Option<u64>, history: Vec<Check>) {
        self.state.send_modify(|s| {
            s.selection.selected_url_id = url_id;
            s.url_history = history;
        });
    }

    pub fn set_period(&self, hours: u32) {
        self.state.send_modify(|s| s.selection.period_hours = hours);
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.send_modify(|s| s.loading = loading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ResultStatus, StepStatus};

    fn url(id: u64) -> MonitoredUrl {
        MonitoredUrl {
            id,
            name: format!("site {}", id),
            url: format!("https://site{}.example", id),
            latest_check: None,
            is_active: None,
            created_at: None,
        }
    }

    fn test(id: u64) -> SyntheticTest {
        SyntheticTest {
            id,
            test_name: format!("flow {}", id),
            site_url: "https://shop.example".to_string(),
            latest_status: None,
            latest_execution: None,
            latest_duration: None,
        }
    }

    fn result(id: u64, test_id: u64) -> SyntheticResult {
        SyntheticResult {
            id,
            test_id,
            executed_at: None,
            status: ResultStatus::Success,
            steps_completed: 6,
            total_steps: 6,
            duration_seconds: 30.0,
            success_rate: 100.0,
            error_message: None,
        }
    }

    fn step(id: u64, order: u32) -> SyntheticStep {
        SyntheticStep {
            id,
            result_id: 1,
            step_order: order,
            step_name: format!("step {}", order),
            status: StepStatus::Success,
            duration_seconds: 1.0,
            error_message: None,
        }
    }

    #[test]
    fn starts_with_defaults() {
        let store = ViewStore::new(6);
        let snap = store.snapshot();
        assert!(snap.urls.is_empty());
        assert_eq!(snap.stats, Stats::default());
        assert_eq!(snap.selection.period_hours, 6);
        assert!(!snap.loading);
    }

    #[test]
    fn url_selection_survives_when_id_still_present() {
        let store = ViewStore::default();
        store.set_url_history(Some(2), Vec::new());
        store.set_urls(vec![url(1), url(2)]);
        assert_eq!(store.selection().selected_url_id, Some(2));
    }

    #[test]
    fn url_selection_cleared_when_id_disappears() {
        let store = ViewStore::default();
        store.set_urls(vec![url(1), url(2)]);
        store.set_url_history(Some(2), Vec::new());
        store.set_urls(vec![url(1)]);
        let snap = store.snapshot();
        assert_eq!(snap.selection.selected_url_id, None);
        assert!(snap.url_history.is_empty());
        assert_eq!(snap.urls.len(), 1);
    }

    #[test]
    fn removing_selected_test_clears_results_and_steps() {
        let store = ViewStore::default();
        store.set_synthetic_tests(vec![test(1), test(2)]);
        store.set_test_results(Some(2), vec![result(7, 2)]);
        store.set_result_steps(Some(7), vec![step(1, 1)]);
        store.set_synthetic_tests(vec![test(1)]);

        let snap = store.snapshot();
        assert_eq!(snap.selection.selected_test_id, None);
        assert_eq!(snap.selection.selected_result_id, None);
        assert!(snap.test_results.is_empty());
        assert!(snap.result_steps.is_empty());
    }

    #[test]
    fn switching_tests_drops_previous_steps() {
        let store = ViewStore::default();
        store.set_test_results(Some(1), vec![result(7, 1)]);
        store.set_result_steps(Some(7), vec![step(1, 1)]);
        store.set_test_results(Some(2), vec![result(8, 2)]);

        let snap = store.snapshot();
        assert_eq!(snap.selection.selected_test_id, Some(2));
        assert_eq!(snap.selection.selected_result_id, None);
        assert!(snap.result_steps.is_empty());
    }

    #[test]
    fn refreshing_same_test_keeps_selected_result() {
        let store = ViewStore::default();
        store.set_test_results(Some(1), vec![result(7, 1)]);
        store.set_result_steps(Some(7), vec![step(1, 1)]);
        store.set_test_results(Some(1), vec![result(8, 1), result(7, 1)]);

        let snap = store.snapshot();
        assert_eq!(snap.selection.selected_result_id, Some(7));
        assert_eq!(snap.result_steps.len(), 1);
    }

    #[test]
    fn steps_are_ordered() {
        let store = ViewStore::default();
        store.set_result_steps(Some(1), vec![step(3, 3), step(1, 1), step(2, 2)]);
        let orders: Vec<u32> = store
            .snapshot()
            .result_steps
            .iter()
            .map(|s| s.step_order)
            .collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn subscribers_see_each_write() {
        let store = ViewStore::default();
        let mut rx = store.subscribe();
        store.set_loading(true);
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().loading);
    }
}
