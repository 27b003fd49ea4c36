pub mod api;
pub mod services;
pub mod state;

use infrastructure::config::ServerConfig;
use state::AppState;
use std::sync::Arc;

pub fn setup_app_state(config: &ServerConfig) -> Arc<AppState> {
    Arc::new(AppState::in_memory(config))
}
