use async_trait::async_trait;
use dashmap::DashMap;

use domain::DomainError;
use domain::media::{MediaFile, MediaId, MediaRepository};
use domain::playlist::{
    Assignment, AssignmentRepository, Playlist, PlaylistId, PlaylistRepository,
};
use domain::template::{Template, TemplateId, TemplateRepository};
use domain::tv::{Tv, TvId, TvRepository};

use super::table::Table;

/// TVs kept in registration order
pub struct InMemoryTvRepository {
    table: Table<TvId, Tv>,
}

impl InMemoryTvRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryTvRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TvRepository for InMemoryTvRepository {
    async fn save(&self, tv: &Tv) -> Result<(), DomainError> {
        self.table.upsert(tv.id().clone(), tv.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TvId) -> Result<Option<Tv>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn find_all(&self) -> Result<Vec<Tv>, DomainError> {
        Ok(self.table.values())
    }

    async fn delete(&self, id: &TvId) -> Result<bool, DomainError> {
        Ok(self.table.remove(id).is_some())
    }
}

pub struct InMemoryMediaRepository {
    table: Table<MediaId, MediaFile>,
}

impl InMemoryMediaRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryMediaRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaRepository for InMemoryMediaRepository {
    async fn save(&self, file: &MediaFile) -> Result<(), DomainError> {
        self.table.upsert(file.id.clone(), file.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MediaId) -> Result<Option<MediaFile>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn find_by_path(&self, path: &str) -> Result<Option<MediaFile>, DomainError> {
        Ok(self.table.find(|m| m.path == path))
    }

    async fn find_all(&self) -> Result<Vec<MediaFile>, DomainError> {
        let mut files = self.table.values();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    async fn delete(&self, id: &MediaId) -> Result<bool, DomainError> {
        Ok(self.table.remove(id).is_some())
    }
}

/// Playlists kept in creation order
pub struct InMemoryPlaylistRepository {
    table: Table<PlaylistId, Playlist>,
}

impl InMemoryPlaylistRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryPlaylistRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryPlaylistRepository {
    async fn save(&self, playlist: &Playlist) -> Result<(), DomainError> {
        self.table.upsert(playlist.id().clone(), playlist.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PlaylistId) -> Result<Option<Playlist>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn find_all(&self) -> Result<Vec<Playlist>, DomainError> {
        Ok(self.table.values())
    }

    async fn delete(&self, id: &PlaylistId) -> Result<bool, DomainError> {
        Ok(self.table.remove(id).is_some())
    }
}

/// TV -> playlist map
pub struct InMemoryAssignmentRepository {
    assignments: DashMap<TvId, PlaylistId>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self {
            assignments: DashMap::new(),
        }
    }
}

impl Default for InMemoryAssignmentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn assign(
        &self,
        tv: &TvId,
        playlist: &PlaylistId,
    ) -> Result<Option<PlaylistId>, DomainError> {
        Ok(self.assignments.insert(tv.clone(), playlist.clone()))
    }

    async fn find_by_tv(&self, tv: &TvId) -> Result<Option<PlaylistId>, DomainError> {
        Ok(self.assignments.get(tv).map(|p| p.value().clone()))
    }

    async fn find_all(&self) -> Result<Vec<Assignment>, DomainError> {
        let mut all: Vec<Assignment> = self
            .assignments
            .iter()
            .map(|entry| Assignment {
                tv_id: entry.key().clone(),
                playlist_id: entry.value().clone(),
            })
            .collect();
        all.sort_by(|a, b| a.tv_id.cmp(&b.tv_id));
        Ok(all)
    }

    async fn remove_tv(&self, tv: &TvId) -> Result<Option<PlaylistId>, DomainError> {
        Ok(self.assignments.remove(tv).map(|(_, p)| p))
    }

    async fn remove_playlist(&self, playlist: &PlaylistId) -> Result<Vec<TvId>, DomainError> {
        let tvs: Vec<TvId> = self
            .assignments
            .iter()
            .filter(|entry| entry.value() == playlist)
            .map(|entry| entry.key().clone())
            .collect();
        let mut removed = Vec::with_capacity(tvs.len());
        for tv in tvs {
            if self
                .assignments
                .remove_if(&tv, |_, current| current == playlist)
                .is_some()
            {
                removed.push(tv);
            }
        }
        removed.sort();
        Ok(removed)
    }
}

pub struct InMemoryTemplateRepository {
    table: Table<TemplateId, Template>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }
}

impl Default for InMemoryTemplateRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn save(&self, template: &Template) -> Result<(), DomainError> {
        self.table.upsert(template.id.clone(), template.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &TemplateId) -> Result<Option<Template>, DomainError> {
        Ok(self.table.get(id))
    }

    async fn find_all(&self) -> Result<Vec<Template>, DomainError> {
        Ok(self.table.values())
    }

    async fn delete(&self, id: &TemplateId) -> Result<bool, DomainError> {
        Ok(self.table.remove(id).is_some())
    }
}
