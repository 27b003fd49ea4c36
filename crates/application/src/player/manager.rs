use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use domain::player::{ContentSource, SlideRenderer};
use domain::tv::TvId;
use domain::DomainError;

use super::{PlayerRuntime, PlayerSettings, PlayerSnapshot};

struct RunningPlayer {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
    snapshot: watch::Receiver<PlayerSnapshot>,
}

/// Lifecycle of player runtimes, at most one per TV
pub struct PlayerManager {
    source: Arc<dyn ContentSource>,
    renderer: Arc<dyn SlideRenderer>,
    settings: PlayerSettings,
    players: DashMap<TvId, RunningPlayer>,
}

impl PlayerManager {
    pub fn new(
        source: Arc<dyn ContentSource>,
        renderer: Arc<dyn SlideRenderer>,
        settings: PlayerSettings,
    ) -> Self {
        Self {
            source,
            renderer,
            settings,
            players: DashMap::new(),
        }
    }

    pub fn start(&self, tv_id: TvId) -> Result<(), DomainError> {
        match self.players.entry(tv_id.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "Player for {tv_id} is already running"
            ))),
            Entry::Vacant(slot) => {
                let runtime = PlayerRuntime::new(
                    tv_id.clone(),
                    self.source.clone(),
                    self.renderer.clone(),
                    self.settings,
                );
                let cancel_token = runtime.cancel_token();
                let snapshot = runtime.subscribe();
                let handle = tokio::spawn(runtime.run());

                slot.insert(RunningPlayer {
                    cancel_token,
                    handle,
                    snapshot,
                });
                info!(tv_id = %tv_id, "Player started");
                Ok(())
            }
        }
    }

    /// Cancel the runtime and wait for it to finish
    pub async fn stop(&self, tv_id: &TvId) -> Result<(), DomainError> {
        let (_, player) = self
            .players
            .remove(tv_id)
            .ok_or_else(|| DomainError::not_found("Player", tv_id))?;

        player.cancel_token.cancel();
        if let Err(e) = player.handle.await {
            warn!(tv_id = %tv_id, "Player task ended abnormally: {}", e);
        }
        Ok(())
    }

    pub async fn stop_all(&self) {
        for tv_id in self.active_tv_ids() {
            // Already gone means a concurrent stop won
            let _ = self.stop(&tv_id).await;
        }
    }

    pub fn active_tv_ids(&self) -> Vec<TvId> {
        let mut ids: Vec<TvId> = self.players.iter().map(|p| p.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn snapshot(&self, tv_id: &TvId) -> Option<PlayerSnapshot> {
        self.players
            .get(tv_id)
            .map(|p| p.snapshot.borrow().clone())
    }
}
