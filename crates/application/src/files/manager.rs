use bytes::Bytes;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use domain::event::{DomainEvent, EventPublisher};
use domain::media::{MediaFile, MediaId, MediaType};
use domain::storage::{FileEntry, StoragePath, validate_name};
use domain::DomainError;

use crate::store::{ContentStore, emit};

/// One uploaded payload
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub data: Bytes,
}

impl Upload {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Folder tree of uploaded files. Image and video payloads double as
/// media usable in playlists.
pub struct FileManager {
    store: ContentStore,
    publisher: Arc<dyn EventPublisher>,
}

impl FileManager {
    pub fn new(store: ContentStore, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Folders first, then files, each by name
    pub async fn list(&self, dir: &StoragePath) -> Result<Vec<FileEntry>, DomainError> {
        let mut entries = self.store.files.list(dir).await?;
        for entry in entries.iter_mut().filter(|e| !e.is_directory) {
            entry.media_id = self.media_at(&dir.join(&entry.name)?).await?.map(|m| m.id);
        }
        Ok(entries)
    }

    pub async fn create_folder(
        &self,
        dir: &StoragePath,
        name: &str,
    ) -> Result<FileEntry, DomainError> {
        let _guard = self.store.lock().await;

        let path = dir.join(name)?;
        let entry = self.store.files.create_folder(dir, name).await?;

        info!(path = %path, "Folder created");
        emit(&self.publisher, DomainEvent::folder_created(path.to_string())).await;
        Ok(entry)
    }

    /// Store every payload in `dir`. All names are checked before anything
    /// is written, so a rejected batch leaves the folder untouched.
    pub async fn upload(
        &self,
        dir: &StoragePath,
        uploads: Vec<Upload>,
    ) -> Result<Vec<FileEntry>, DomainError> {
        if uploads.is_empty() {
            return Err(DomainError::validation("No files to upload"));
        }

        let _guard = self.store.lock().await;

        let existing: HashSet<String> = self
            .store
            .files
            .list(dir)
            .await?
            .into_iter()
            .map(|e| e.name)
            .collect();
        let mut batch = HashSet::new();
        for upload in &uploads {
            validate_name(&upload.name)?;
            if existing.contains(&upload.name) || !batch.insert(upload.name.as_str()) {
                return Err(DomainError::Conflict(format!(
                    "{} already exists in {dir}",
                    upload.name
                )));
            }
        }

        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let path = dir.join(&upload.name)?;
            let mut entry = self
                .store
                .files
                .put_file(dir, &upload.name, upload.data)
                .await?;

            if let Some(media_type) = MediaType::from_file_name(&upload.name) {
                let media = MediaFile::new(
                    MediaId::new(Uuid::new_v4().to_string()),
                    upload.name.clone(),
                    media_type,
                    path.public_url(),
                );
                self.store.media.save(&media).await?;
                debug!(media_id = %media.id, path = %media.path, "Registered media file");
                entry.media_id = Some(media.id);
            }

            info!(path = %path, size = entry.size, "File uploaded");
            emit(
                &self.publisher,
                DomainEvent::file_uploaded(path.to_string(), entry.size),
            )
            .await;
            stored.push(entry);
        }
        Ok(stored)
    }

    /// Delete a file or an empty folder. Media still used by a playlist or
    /// template cannot be deleted.
    pub async fn delete(&self, dir: &StoragePath, name: &str) -> Result<FileEntry, DomainError> {
        let _guard = self.store.lock().await;

        let path = dir.join(name)?;
        let media = self.media_at(&path).await?;
        if let Some(media) = &media {
            self.ensure_unreferenced(media).await?;
        }

        let entry = self.store.files.delete(dir, name).await?;
        if let Some(media) = media {
            self.store.media.delete(&media.id).await?;
        }

        info!(path = %path, directory = entry.is_directory, "File deleted");
        emit(&self.publisher, DomainEvent::file_deleted(path.to_string())).await;
        Ok(entry)
    }

    /// Payload and MIME type of a stored file
    pub async fn read(&self, path: &StoragePath) -> Result<(Bytes, &'static str), DomainError> {
        let data = self.store.files.read(path).await?;
        let content_type = MediaType::content_type(path.file_name().unwrap_or_default());
        Ok((data, content_type))
    }

    async fn media_at(&self, path: &StoragePath) -> Result<Option<MediaFile>, DomainError> {
        self.store.media.find_by_path(&path.public_url()).await
    }

    async fn ensure_unreferenced(&self, media: &MediaFile) -> Result<(), DomainError> {
        if let Some(playlist) = self
            .store
            .playlists
            .find_all()
            .await?
            .into_iter()
            .find(|p| p.references_media(&media.id))
        {
            return Err(DomainError::Conflict(format!(
                "{} is used by playlist {}",
                media.name,
                playlist.id()
            )));
        }

        if let Some(template) = self
            .store
            .templates
            .find_all()
            .await?
            .into_iter()
            .find(|t| t.background.as_deref() == Some(media.path.as_str()))
        {
            return Err(DomainError::Conflict(format!(
                "{} is the background of template {}",
                media.name, template.id
            )));
        }
        Ok(())
    }
}
