use std::sync::Arc;

use axum::extract::FromRef;

use shared_config::AppConfig;

use crate::store::ClinicStore;

/// Router state shared by every cell.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ClinicStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ClinicStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.config)
    }
}
