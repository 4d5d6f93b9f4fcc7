//! Runs a synthetic test and picks up its results once, after a fixed delay.
//!
//! The backend executes tests in the background, so the run request returns
//! before any result exists. One delayed re-poll refreshes the test list, the
//! synthetic stats and that test's results. If the run is still going at that
//! point nothing more happens until the user asks again.

use crate::api::payload;
use crate::fetch::Fetchers;
use crate::notice::Notice;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub const DEFAULT_REPOLL_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Triggering,
    AwaitingResults,
    Refreshed,
    Failed,
}

pub struct TriggerOutcome {
    pub notice: Notice,
    /// The scheduled re-poll; `None` when the run was not accepted.
    pub repoll: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct WorkflowController {
    fetchers: Fetchers,
    delay: Duration,
    states: Arc<Mutex<HashMap<u64, WorkflowState>>>,
}

impl WorkflowController {
    pub fn new(fetchers: Fetchers, delay: Duration) -> Self {
        Self {
            fetchers,
            delay,
            states: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn state(&self, test_id: u64) -> WorkflowState {
        self.states
            .lock()
            .await
            .get(&test_id)
            .copied()
            .unwrap_or(WorkflowState::Idle)
    }

    async fn set_state(&self, test_id: u64, state: WorkflowState) {
        self.states.lock().await.insert(test_id, state);
    }

    pub async fn execute(&self, test_id: u64) -> TriggerOutcome {
        self.set_state(test_id, WorkflowState::Triggering).await;
        let store = self.fetchers.store();
        store.set_loading(true);

        let path = format!("synthetic-tests/{}/execute", test_id);
        let accepted = match self.fetchers.backend().post(&path, None).await {
            Ok(value) => payload::expect_success(value),
            Err(e) => Err(e),
        };
        store.set_loading(false);

        if let Err(e) = accepted {
            log::error!("Synthetic test {} was not started: {}", test_id, e);
            self.set_state(test_id, WorkflowState::Failed).await;
            return TriggerOutcome {
                notice: Notice::from_error("Failed to start synthetic test", &e),
                repoll: None,
            };
        }

        log::info!(
            "Synthetic test {} started, re-polling in {}s",
            test_id,
            self.delay.as_secs()
        );
        self.set_state(test_id, WorkflowState::AwaitingResults).await;

        let controller = self.clone();
        let repoll = tokio::spawn(async move {
            tokio::time::sleep(controller.delay).await;
            let fetchers = &controller.fetchers;
            futures::join!(
                fetchers.fetch_synthetic_tests(),
                fetchers.fetch_synthetic_stats(),
                fetchers.fetch_test_results(test_id)
            );
            controller.set_state(test_id, WorkflowState::Refreshed).await;
            log::debug!("Synthetic test {} results refreshed", test_id);
        });

        TriggerOutcome {
            notice: Notice::info("Synthetic test started. Results will appear shortly."),
            repoll: Some(repoll),
        }
    }
}
