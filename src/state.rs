//! Shared state injected into every HTTP handler.

use std::sync::Arc;

use crate::application::services::LinkManagementService;
use crate::domain::repositories::LinkRepository;
use crate::queue::LocalBackgroundRunner;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkManagementService>,
    pub repository: Arc<dyn LinkRepository>,
    pub runner: Arc<LocalBackgroundRunner>,
}

impl AppState {
    pub fn new(
        link_service: Arc<LinkManagementService>,
        repository: Arc<dyn LinkRepository>,
        runner: Arc<LocalBackgroundRunner>,
    ) -> Self {
        Self {
            link_service,
            repository,
            runner,
        }
    }
}
