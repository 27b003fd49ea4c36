use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use domain::event::{DomainEvent, EventPublisher};
use domain::media::{MediaFile, MediaId};
use domain::player::TvContent;
use domain::playlist::{
    ActivationScope, Assignment, Playlist, PlaylistDraft, PlaylistId, playlists_to_supersede,
};
use domain::template::TemplateId;
use domain::tv::TvId;
use domain::{DomainError, playlist::DEFAULT_SLIDE_DURATION_SECS};

use crate::store::{ContentStore, emit};

/// Operator input as received from the admin API
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub files: Vec<MediaId>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default, rename = "loop")]
    pub loop_playback: Option<bool>,
    #[serde(default)]
    pub assigned_tvs: Vec<TvId>,
    #[serde(default)]
    pub template_id: Option<TemplateId>,
}

impl PlaylistRequest {
    pub fn new(name: impl Into<String>, files: Vec<MediaId>) -> Self {
        Self {
            name: name.into(),
            files,
            duration_secs: None,
            loop_playback: None,
            assigned_tvs: Vec::new(),
            template_id: None,
        }
    }

    pub fn with_tvs(mut self, tvs: Vec<TvId>) -> Self {
        self.assigned_tvs = tvs;
        self
    }
}

/// Result of an activation: the live playlist and whatever it switched off
#[derive(Debug, Clone, Serialize)]
pub struct ActivationOutcome {
    pub playlist: Playlist,
    pub superseded: Vec<PlaylistId>,
}

/// Playlist lifecycle and the TV -> playlist assignment map
pub struct PlaylistManager {
    store: ContentStore,
    publisher: Arc<dyn EventPublisher>,
    scope: ActivationScope,
    next_id: AtomicU64,
}

impl PlaylistManager {
    pub fn new(
        store: ContentStore,
        publisher: Arc<dyn EventPublisher>,
        scope: ActivationScope,
    ) -> Self {
        Self {
            store,
            publisher,
            scope,
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn list(&self) -> Result<Vec<Playlist>, DomainError> {
        self.store.playlists.find_all().await
    }

    pub async fn get(&self, id: &PlaylistId) -> Result<Playlist, DomainError> {
        self.store
            .playlists
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Playlist", id))
    }

    /// Media files available for playlists
    pub async fn list_media(&self) -> Result<Vec<MediaFile>, DomainError> {
        self.store.media.find_all().await
    }

    pub async fn assignments(&self) -> Result<Vec<Assignment>, DomainError> {
        self.store.assignments.find_all().await
    }

    pub async fn create(&self, request: PlaylistRequest) -> Result<Playlist, DomainError> {
        let _guard = self.store.lock().await;

        let draft = self.resolve(request).await?;
        let id = self.allocate_id().await?;
        let playlist = Playlist::create(id, draft)?;
        self.store.playlists.save(&playlist).await?;

        info!(playlist_id = %playlist.id(), name = %playlist.name, "Playlist created");
        emit(
            &self.publisher,
            DomainEvent::playlist_created(playlist.id().clone(), playlist.name.clone()),
        )
        .await;
        Ok(playlist)
    }

    pub async fn update(
        &self,
        id: &PlaylistId,
        request: PlaylistRequest,
    ) -> Result<Playlist, DomainError> {
        let _guard = self.store.lock().await;

        let mut playlist = self.get(id).await?;
        let draft = self.resolve(request).await?;
        playlist.apply(draft)?;

        if playlist.is_active() {
            // New targets may collide with other live playlists
            self.apply_activation(&mut playlist).await?;
        } else {
            self.store.playlists.save(&playlist).await?;
        }

        info!(playlist_id = %id, revision = playlist.revision(), "Playlist updated");
        emit(
            &self.publisher,
            DomainEvent::playlist_updated(id.clone(), playlist.revision()),
        )
        .await;
        Ok(playlist)
    }

    /// Put a playlist live on its target TVs.
    ///
    /// Other active playlists are deactivated according to the configured
    /// [`ActivationScope`]; afterwards every target TV maps to this playlist.
    pub async fn activate(&self, id: &PlaylistId) -> Result<ActivationOutcome, DomainError> {
        let _guard = self.store.lock().await;

        let mut playlist = self.get(id).await?;
        let superseded = self.apply_activation(&mut playlist).await?;

        info!(
            playlist_id = %id,
            tvs = playlist.assigned_tvs().len(),
            superseded = superseded.len(),
            "Playlist activated"
        );
        emit(
            &self.publisher,
            DomainEvent::playlist_activated(
                id.clone(),
                playlist.assigned_tvs().iter().cloned().collect(),
                superseded.clone(),
            ),
        )
        .await;

        Ok(ActivationOutcome {
            playlist,
            superseded,
        })
    }

    pub async fn deactivate(&self, id: &PlaylistId) -> Result<Playlist, DomainError> {
        let _guard = self.store.lock().await;

        let mut playlist = self.get(id).await?;
        if playlist.deactivate() {
            self.store.playlists.save(&playlist).await?;
            self.release_assignments(id).await?;
            info!(playlist_id = %id, "Playlist deactivated");
            emit(
                &self.publisher,
                DomainEvent::playlist_deactivated(id.clone(), "Deactivated by operator"),
            )
            .await;
        }
        Ok(playlist)
    }

    /// Remove a playlist and clear every assignment pointing at it
    pub async fn delete(&self, id: &PlaylistId) -> Result<(), DomainError> {
        let _guard = self.store.lock().await;

        self.get(id).await?;
        self.release_assignments(id).await?;
        self.store.playlists.delete(id).await?;

        info!(playlist_id = %id, "Playlist deleted");
        emit(&self.publisher, DomainEvent::playlist_deleted(id.clone())).await;
        Ok(())
    }

    /// Move a TV to a playlist. The TV leaves every other playlist; if the
    /// target is live the TV starts playing it immediately.
    pub async fn assign(&self, tv: &TvId, id: &PlaylistId) -> Result<Playlist, DomainError> {
        let _guard = self.store.lock().await;

        self.ensure_tv(tv).await?;
        let mut playlist = self.get(id).await?;

        self.detach_tv_locked(tv).await?;
        playlist.add_target(tv.clone());
        self.store.playlists.save(&playlist).await?;

        let now_playing = if playlist.is_active() {
            self.store.assignments.assign(tv, id).await?;
            Some(id.clone())
        } else {
            None
        };

        info!(tv_id = %tv, playlist_id = %id, live = playlist.is_active(), "TV assigned");
        emit(
            &self.publisher,
            DomainEvent::assignment_changed(tv.clone(), now_playing),
        )
        .await;
        Ok(playlist)
    }

    /// Take a TV out of every playlist. Returns true if it was playing one.
    pub async fn unassign(&self, tv: &TvId) -> Result<bool, DomainError> {
        let _guard = self.store.lock().await;

        self.ensure_tv(tv).await?;
        let was_playing = self.detach_tv_locked(tv).await?;
        if was_playing {
            info!(tv_id = %tv, "TV unassigned");
            emit(&self.publisher, DomainEvent::assignment_changed(tv.clone(), None)).await;
        }
        Ok(was_playing)
    }

    /// What `tv` should be showing. Unassigned TVs get empty content.
    pub async fn content_for(&self, tv: &TvId) -> Result<TvContent, DomainError> {
        let _guard = self.store.lock().await;

        self.ensure_tv(tv).await?;
        let Some(playlist_id) = self.store.assignments.find_by_tv(tv).await? else {
            return Ok(TvContent::empty(tv.clone()));
        };

        let playlist = match self.store.playlists.find_by_id(&playlist_id).await? {
            Some(p) if p.is_active() => p,
            _ => return Ok(TvContent::empty(tv.clone())),
        };

        let template = match &playlist.template_id {
            Some(template_id) => self.store.templates.find_by_id(template_id).await?,
            None => None,
        };

        Ok(TvContent::from_playlist(tv.clone(), &playlist, template))
    }

    /// Drop a TV from every playlist target set and from the assignment map.
    /// The caller must hold the store lock.
    pub(crate) async fn detach_tv_locked(&self, tv: &TvId) -> Result<bool, DomainError> {
        for mut playlist in self.store.playlists.find_all().await? {
            if playlist.remove_target(tv) {
                debug!(tv_id = %tv, playlist_id = %playlist.id(), "Removing TV from playlist targets");
                self.store.playlists.save(&playlist).await?;
            }
        }
        Ok(self.store.assignments.remove_tv(tv).await?.is_some())
    }

    async fn apply_activation(
        &self,
        playlist: &mut Playlist,
    ) -> Result<Vec<PlaylistId>, DomainError> {
        playlist.activate()?;

        let all = self.store.playlists.find_all().await?;
        let superseded = playlists_to_supersede(playlist, &all, self.scope);

        let mut released = Vec::new();
        for other_id in &superseded {
            if let Some(mut other) = all.iter().find(|p| p.id() == other_id).cloned() {
                other.deactivate();
                self.store.playlists.save(&other).await?;
                released.extend(self.store.assignments.remove_playlist(other_id).await?);
                info!(playlist_id = %other_id, by = %playlist.id(), "Playlist superseded");
                emit(
                    &self.publisher,
                    DomainEvent::playlist_deactivated(
                        other_id.clone(),
                        format!("Superseded by {}", playlist.id()),
                    ),
                )
                .await;
            }
        }

        // TVs dropped from the targets by an edit lose this playlist
        let previous = self.store.assignments.remove_playlist(playlist.id()).await?;
        for tv in playlist.assigned_tvs() {
            self.store.assignments.assign(tv, playlist.id()).await?;
            if !previous.contains(tv) {
                emit(
                    &self.publisher,
                    DomainEvent::assignment_changed(tv.clone(), Some(playlist.id().clone())),
                )
                .await;
            }
        }
        // Released TVs outside the new targets end up unassigned
        for tv in previous.iter().chain(&released).filter(|tv| !playlist.targets(tv)) {
            emit(&self.publisher, DomainEvent::assignment_changed(tv.clone(), None)).await;
        }

        self.store.playlists.save(playlist).await?;
        Ok(superseded)
    }

    async fn release_assignments(&self, id: &PlaylistId) -> Result<(), DomainError> {
        for tv in self.store.assignments.remove_playlist(id).await? {
            emit(&self.publisher, DomainEvent::assignment_changed(tv, None)).await;
        }
        Ok(())
    }

    async fn resolve(&self, request: PlaylistRequest) -> Result<PlaylistDraft, DomainError> {
        let mut files = Vec::with_capacity(request.files.len());
        for media_id in &request.files {
            let file = self
                .store
                .media
                .find_by_id(media_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Media", media_id))?;
            files.push(file);
        }

        let mut tvs = BTreeSet::new();
        for tv in request.assigned_tvs {
            self.ensure_tv(&tv).await?;
            tvs.insert(tv);
        }

        if let Some(template_id) = &request.template_id {
            if self.store.templates.find_by_id(template_id).await?.is_none() {
                return Err(DomainError::not_found("Template", template_id));
            }
        }

        Ok(PlaylistDraft::new(request.name, files)
            .with_duration(request.duration_secs.unwrap_or(DEFAULT_SLIDE_DURATION_SECS))
            .with_loop(request.loop_playback.unwrap_or(true))
            .with_tvs(tvs)
            .with_template(request.template_id))
    }

    async fn ensure_tv(&self, tv: &TvId) -> Result<(), DomainError> {
        match self.store.tvs.find_by_id(tv).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("TV", tv)),
        }
    }

    /// Never reuses an id, even after deletions
    async fn allocate_id(&self) -> Result<PlaylistId, DomainError> {
        loop {
            let id = PlaylistId::from_sequence(self.next_id.fetch_add(1, Ordering::SeqCst));
            if self.store.playlists.find_by_id(&id).await?.is_none() {
                return Ok(id);
            }
        }
    }
}
