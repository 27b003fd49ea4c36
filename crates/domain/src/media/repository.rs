use super::{MediaFile, MediaId};
use crate::DomainError;
use async_trait::async_trait;

/// Repository interface for media metadata
#[async_trait]
pub trait MediaRepository: Send + Sync {
    async fn save(&self, file: &MediaFile) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &MediaId) -> Result<Option<MediaFile>, DomainError>;

    async fn find_by_path(&self, path: &str) -> Result<Option<MediaFile>, DomainError>;

    /// All media ordered by path
    async fn find_all(&self) -> Result<Vec<MediaFile>, DomainError>;

    async fn delete(&self, id: &MediaId) -> Result<bool, DomainError>;
}
