use super::{Tv, TvId};
use crate::DomainError;
use async_trait::async_trait;

/// Repository interface for the TV registry
#[async_trait]
pub trait TvRepository: Send + Sync {
    /// Insert a new TV or replace an existing one
    async fn save(&self, tv: &Tv) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &TvId) -> Result<Option<Tv>, DomainError>;

    /// All TVs ordered by registration
    async fn find_all(&self) -> Result<Vec<Tv>, DomainError>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: &TvId) -> Result<bool, DomainError>;
}
