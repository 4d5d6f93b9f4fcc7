use crate::api::payload;
use crate::fetch::Fetchers;
use crate::notice::Notice;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Polling,
}

/// Drives every fetcher on a fixed cadence.
///
/// While armed, a background task refreshes once immediately and then on every
/// tick. Tearing down aborts that task; a response still in flight at that
/// point is dropped and never reaches the store.
pub struct RefreshScheduler {
    fetchers: Fetchers,
    interval: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
    state_watcher: Arc<watch::Sender<SchedulerState>>,
}

impl RefreshScheduler {
    pub fn new(fetchers: Fetchers, interval: Duration) -> Self {
        let (state_tx, _) = watch::channel(SchedulerState::Idle);

        Self {
            fetchers,
            interval,
            timer: Mutex::new(None),
            state_watcher: Arc::new(state_tx),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> SchedulerState {
        *self.state_watcher.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<SchedulerState> {
        self.state_watcher.subscribe()
    }

    pub async fn is_armed(&self) -> bool {
        self.timer
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Starts the timer, replacing any timer already running.
    pub async fn arm(&self) {
        let mut timer = self.timer.lock().await;
        if let Some(handle) = timer.take() {
            handle.abort();
        }

        let fetchers = self.fetchers.clone();
        let state = self.state_watcher.clone();
        let period = self.interval;

        *timer = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut ticks = IntervalStream::new(interval);

            while ticks.next().await.is_some() {
                state.send_replace(SchedulerState::Polling);
                log::debug!("Refreshing all resources");
                fetchers.refresh_all().await;
                state.send_replace(SchedulerState::Idle);
            }
        }));
        log::info!("Refresh timer armed ({}s)", period.as_secs());
    }

    pub async fn teardown(&self) {
        if let Some(handle) = self.timer.lock().await.take() {
            handle.abort();
            log::info!("Refresh timer stopped");
        }
        self.state_watcher.send_replace(SchedulerState::Idle);
    }

    /// Switches the lookback window and re-arms, so the period-dependent
    /// fetchers run now with the new value.
    pub async fn set_period(&self, hours: u32) {
        self.fetchers.store().set_period(hours);
        log::info!("Lookback window set to {}h", hours);
        self.arm().await;
    }

    /// Asks the backend to probe every URL now, then reloads URLs and stats.
    ///
    /// `loading` is set for this round trip only; the timer keeps running.
    pub async fn check_all(&self) -> Notice {
        let store = self.fetchers.store();
        store.set_loading(true);

        let outcome = match self.fetchers.backend().post("check-all", None).await {
            Ok(value) => payload::expect_success(value),
            Err(e) => Err(e),
        };

        let notice = match outcome {
            Ok(message) => {
                futures::join!(self.fetchers.fetch_urls(), self.fetchers.fetch_stats());
                Notice::info(message.unwrap_or_else(|| "All URLs checked".to_string()))
            }
            Err(e) => {
                log::error!("Check-all failed: {}", e);
                Notice::from_error("Failed to check URLs", &e)
            }
        };

        store.set_loading(false);
        notice
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}
