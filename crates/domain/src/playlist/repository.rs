use super::{Playlist, PlaylistId};
use crate::DomainError;
use async_trait::async_trait;

/// Repository interface for playlists
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn save(&self, playlist: &Playlist) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PlaylistId) -> Result<Option<Playlist>, DomainError>;

    /// All playlists in creation order
    async fn find_all(&self) -> Result<Vec<Playlist>, DomainError>;

    async fn delete(&self, id: &PlaylistId) -> Result<bool, DomainError>;
}
