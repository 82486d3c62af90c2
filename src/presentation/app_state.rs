// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use crate::application::farm_repository::FarmRepository;
use crate::application::status_service::StatusService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub status_service: StatusService,
    /// Used directly by the passthrough endpoints (actuators, camera).
    pub repository: Arc<dyn FarmRepository>,
}
