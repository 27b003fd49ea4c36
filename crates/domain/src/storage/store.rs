use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::StoragePath;
use crate::DomainError;
use crate::media::MediaId;

/// One entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
    /// Set by the file manager for payloads registered as media
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<MediaId>,
}

impl FileEntry {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
            size: 0,
            media_id: None,
        }
    }

    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            size,
            media_id: None,
        }
    }
}

/// Hierarchical file namespace holding uploaded payloads.
///
/// Errors: `NotFound` for missing folders or files, `Conflict` for duplicate
/// names and non-empty folder deletion, `Validation` when a file is used
/// where a folder is expected.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Folders first, then files, each sorted by name
    async fn list(&self, dir: &StoragePath) -> Result<Vec<FileEntry>, DomainError>;

    async fn create_folder(&self, dir: &StoragePath, name: &str) -> Result<FileEntry, DomainError>;

    async fn put_file(
        &self,
        dir: &StoragePath,
        name: &str,
        data: Bytes,
    ) -> Result<FileEntry, DomainError>;

    async fn read(&self, path: &StoragePath) -> Result<Bytes, DomainError>;

    async fn delete(&self, dir: &StoragePath, name: &str) -> Result<FileEntry, DomainError>;
}
