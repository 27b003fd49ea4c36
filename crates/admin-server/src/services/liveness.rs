use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use application::RegistryService;

/// Periodically marks TVs that stopped sending heartbeats as offline
pub struct LivenessMonitor {
    registry: Arc<RegistryService>,
    check_interval: Duration,
    cancel_token: CancellationToken,
}

impl LivenessMonitor {
    pub fn new(registry: Arc<RegistryService>, check_interval: Duration) -> Self {
        Self {
            registry,
            check_interval,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub async fn run(self) {
        info!(
            interval_secs = self.check_interval.as_secs(),
            "Starting liveness monitor"
        );
        let mut interval = tokio::time::interval(self.check_interval);

        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    info!("Liveness monitor stopped");
                    break;
                }
                _ = interval.tick() => {
                    match self.registry.check_liveness(Utc::now()).await {
                        Ok(changed) if !changed.is_empty() => {
                            debug!(count = changed.len(), "TVs marked offline");
                        }
                        Ok(_) => {}
                        Err(e) => error!("Liveness check failed: {}", e),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_app_state;
    use domain::tv::TvStatus;
    use infrastructure::config::ServerConfig;

    #[tokio::test(start_paused = true)]
    async fn test_monitor_sweeps_silent_tvs_periodically() {
        let state = setup_app_state(&ServerConfig::default());
        let registry = state.registry.clone();
        let long_ago = Utc::now() - chrono::Duration::minutes(10);

        let silent = registry.register("TV Recepção", "Recepção Principal").await.unwrap();
        let alive = registry.register("TV Cafeteria", "Cafeteria").await.unwrap();
        registry.heartbeat(silent.id(), long_ago).await.unwrap();
        registry.heartbeat(alive.id(), Utc::now()).await.unwrap();

        let monitor = LivenessMonitor::new(registry.clone(), Duration::from_secs(15));
        let token = monitor.cancel_token();
        let handle = tokio::spawn(monitor.run());

        // First tick fires immediately
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(registry.get(silent.id()).await.unwrap().status(), TvStatus::Offline);
        assert_eq!(registry.get(alive.id()).await.unwrap().status(), TvStatus::Online);

        // A TV going quiet later is caught by the next sweep
        let late = registry.register("TV Hall", "Hall").await.unwrap();
        registry.heartbeat(late.id(), long_ago).await.unwrap();
        assert_eq!(registry.get(late.id()).await.unwrap().status(), TvStatus::Online);

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(registry.get(late.id()).await.unwrap().status(), TvStatus::Offline);
        assert_eq!(registry.get(alive.id()).await.unwrap().status(), TvStatus::Online);

        token.cancel();
        handle.await.unwrap();
    }
}
