use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use super::PlaylistId;
use crate::error::{DomainError, Result};
use crate::media::{MediaFile, MediaId};
use crate::template::TemplateId;
use crate::tv::TvId;

pub const MIN_SLIDE_DURATION_SECS: u32 = 1;
pub const MAX_SLIDE_DURATION_SECS: u32 = 60;
pub const DEFAULT_SLIDE_DURATION_SECS: u32 = 5;

/// Operator input for creating or editing a playlist, with media already
/// resolved against the content store.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDraft {
    pub name: String,
    pub files: Vec<MediaFile>,
    pub duration_secs: u32,
    pub loop_playback: bool,
    pub assigned_tvs: BTreeSet<TvId>,
    pub template_id: Option<TemplateId>,
}

impl PlaylistDraft {
    pub fn new(name: impl Into<String>, files: Vec<MediaFile>) -> Self {
        Self {
            name: name.into(),
            files,
            duration_secs: DEFAULT_SLIDE_DURATION_SECS,
            loop_playback: true,
            assigned_tvs: BTreeSet::new(),
            template_id: None,
        }
    }

    pub fn with_duration(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    pub fn with_loop(mut self, loop_playback: bool) -> Self {
        self.loop_playback = loop_playback;
        self
    }

    pub fn with_tvs(mut self, tvs: impl IntoIterator<Item = TvId>) -> Self {
        self.assigned_tvs = tvs.into_iter().collect();
        self
    }

    pub fn with_template(mut self, template_id: Option<TemplateId>) -> Self {
        self.template_id = template_id;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.files.is_empty() {
            return Err(DomainError::validation(
                "Playlist needs a name and at least one file",
            ));
        }

        if !(MIN_SLIDE_DURATION_SECS..=MAX_SLIDE_DURATION_SECS).contains(&self.duration_secs) {
            return Err(DomainError::Validation(format!(
                "Slide duration must be between {MIN_SLIDE_DURATION_SECS} and {MAX_SLIDE_DURATION_SECS} seconds, got {}",
                self.duration_secs
            )));
        }

        Ok(())
    }
}

/// Ordered, loopable sequence of slides targeting a set of TVs.
///
/// `revision` increases on every content edit so players can tell a
/// changed playlist from an unchanged one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    id: PlaylistId,
    pub name: String,
    pub files: Vec<MediaFile>,
    pub duration_secs: u32,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    assigned_tvs: BTreeSet<TvId>,
    is_active: bool,
    pub template_id: Option<TemplateId>,
    revision: u64,
}

impl Playlist {
    /// New playlists start inactive
    pub fn create(id: PlaylistId, draft: PlaylistDraft) -> Result<Self> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name.trim().to_string(),
            files: draft.files,
            duration_secs: draft.duration_secs,
            loop_playback: draft.loop_playback,
            assigned_tvs: draft.assigned_tvs,
            is_active: false,
            template_id: draft.template_id,
            revision: 1,
        })
    }

    /// Replace the editable fields. Activation state is left untouched.
    pub fn apply(&mut self, draft: PlaylistDraft) -> Result<()> {
        draft.validate()?;
        self.name = draft.name.trim().to_string();
        self.files = draft.files;
        self.duration_secs = draft.duration_secs;
        self.loop_playback = draft.loop_playback;
        self.assigned_tvs = draft.assigned_tvs;
        self.template_id = draft.template_id;
        self.revision += 1;
        Ok(())
    }

    pub fn id(&self) -> &PlaylistId {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn assigned_tvs(&self) -> &BTreeSet<TvId> {
        &self.assigned_tvs
    }

    /// A playlist without files can never go live
    pub fn activate(&mut self) -> Result<()> {
        if self.files.is_empty() {
            return Err(DomainError::Validation(format!(
                "Playlist {} has no files and cannot be activated",
                self.id
            )));
        }
        self.is_active = true;
        Ok(())
    }

    /// Returns true if the playlist was active
    pub fn deactivate(&mut self) -> bool {
        std::mem::replace(&mut self.is_active, false)
    }

    pub fn targets(&self, tv: &TvId) -> bool {
        self.assigned_tvs.contains(tv)
    }

    pub fn overlaps(&self, other: &Playlist) -> bool {
        !self.assigned_tvs.is_disjoint(&other.assigned_tvs)
    }

    pub fn add_target(&mut self, tv: TvId) -> bool {
        self.assigned_tvs.insert(tv)
    }

    pub fn remove_target(&mut self, tv: &TvId) -> bool {
        self.assigned_tvs.remove(tv)
    }

    pub fn references_media(&self, id: &MediaId) -> bool {
        self.files.iter().any(|f| &f.id == id)
    }

    pub fn slide_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }
}
