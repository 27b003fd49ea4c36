use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use domain::player::{ContentSource, TvContent};
use domain::tv::TvId;
use domain::DomainError;

use crate::playlist::PlaylistManager;
use crate::registry::RegistryService;

/// Content source wired straight to the admin services, for players that
/// run in the same process as the control plane.
pub struct LocalContentSource {
    playlists: Arc<PlaylistManager>,
    registry: Arc<RegistryService>,
}

impl LocalContentSource {
    pub fn new(playlists: Arc<PlaylistManager>, registry: Arc<RegistryService>) -> Self {
        Self {
            playlists,
            registry,
        }
    }
}

#[async_trait]
impl ContentSource for LocalContentSource {
    async fn fetch_content(&self, tv_id: &TvId) -> Result<TvContent, DomainError> {
        self.playlists.content_for(tv_id).await
    }

    async fn send_heartbeat(&self, tv_id: &TvId) -> Result<(), DomainError> {
        self.registry.heartbeat(tv_id, Utc::now()).await.map(|_| ())
    }
}
