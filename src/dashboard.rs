use crate::actions::Actions;
use crate::api::{Backend, HttpBackend};
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::fetch::Fetchers;
use crate::scheduler::RefreshScheduler;
use crate::store::ViewStore;
use crate::timeline::{self, Timeline};
use crate::workflow::WorkflowController;
use std::sync::Arc;

/// Everything a front end needs, wired to one store.
pub struct Dashboard {
    store: Arc<ViewStore>,
    fetchers: Fetchers,
    scheduler: RefreshScheduler,
    workflow: WorkflowController,
    actions: Actions,
}

impl Dashboard {
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let backend = HttpBackend::new(
            &config.api_base,
            config.request_timeout(),
            &config.user_agent,
        )?;
        log::info!("Using API at {}", config.api_base);
        Ok(Self::new(Arc::new(backend), config))
    }

    pub fn new(backend: Arc<dyn Backend>, config: &DashboardConfig) -> Self {
        let store = Arc::new(ViewStore::new(config.period_hours));
        let fetchers = Fetchers::new(backend, store.clone()).with_history_limit(config.history_limit);

        Self {
            scheduler: RefreshScheduler::new(fetchers.clone(), config.refresh_interval()),
            workflow: WorkflowController::new(fetchers.clone(), config.repoll_delay()),
            actions: Actions::new(fetchers.clone()),
            store,
            fetchers,
        }
    }

    pub fn store(&self) -> &Arc<ViewStore> {
        &self.store
    }

    pub fn fetchers(&self) -> &Fetchers {
        &self.fetchers
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn workflow(&self) -> &WorkflowController {
        &self.workflow
    }

    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Aligned chart for the current snapshot. Recomputed on every call.
    pub fn timeline(&self) -> Timeline {
        timeline::align(&self.store.snapshot().consolidated)
    }
}
