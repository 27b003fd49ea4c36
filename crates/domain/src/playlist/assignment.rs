use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::PlaylistId;
use crate::DomainError;
use crate::tv::TvId;

/// A TV currently playing a playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub tv_id: TvId,
    pub playlist_id: PlaylistId,
}

/// TV -> active playlist map. Each TV maps to zero or one playlist.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Point the TV at a playlist, returning the playlist it replaced
    async fn assign(
        &self,
        tv: &TvId,
        playlist: &PlaylistId,
    ) -> Result<Option<PlaylistId>, DomainError>;

    async fn find_by_tv(&self, tv: &TvId) -> Result<Option<PlaylistId>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Assignment>, DomainError>;

    async fn remove_tv(&self, tv: &TvId) -> Result<Option<PlaylistId>, DomainError>;

    /// Drop every entry pointing at the playlist, returning the affected TVs
    async fn remove_playlist(&self, playlist: &PlaylistId) -> Result<Vec<TvId>, DomainError>;
}
