use std::sync::Arc;

use crate::analysis::ThreatPipeline;
use crate::monitor::MonitorController;
use crate::storage::AlertStore;

#[derive(Clone)]
pub struct AppState {
    pub controller: MonitorController,
    pub store: AlertStore,
    pub pipeline: Arc<ThreatPipeline>,
}
