use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::media::MediaType;
use crate::playlist::{DEFAULT_SLIDE_DURATION_SECS, Playlist, PlaylistId};
use crate::template::Template;
use crate::tv::TvId;

/// A single playable unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
}

/// What a TV should be showing right now, as served by `GET /content/{tv_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvContent {
    pub tv_id: TvId,
    pub playlist_id: Option<PlaylistId>,
    #[serde(default)]
    pub playlist_name: Option<String>,
    #[serde(default)]
    pub revision: u64,
    pub duration_secs: u32,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub template: Option<Template>,
}

impl TvContent {
    /// Nothing assigned
    pub fn empty(tv_id: TvId) -> Self {
        Self {
            tv_id,
            playlist_id: None,
            playlist_name: None,
            revision: 0,
            duration_secs: DEFAULT_SLIDE_DURATION_SECS,
            loop_playback: true,
            slides: Vec::new(),
            template: None,
        }
    }

    pub fn from_playlist(tv_id: TvId, playlist: &Playlist, template: Option<Template>) -> Self {
        Self {
            tv_id,
            playlist_id: Some(playlist.id().clone()),
            playlist_name: Some(playlist.name.clone()),
            revision: playlist.revision(),
            duration_secs: playlist.duration_secs,
            loop_playback: playlist.loop_playback,
            slides: playlist
                .files
                .iter()
                .map(|f| Slide {
                    media_type: f.media_type,
                    url: f.path.clone(),
                })
                .collect(),
            template,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Two contents with the same fingerprint render identically
    pub fn fingerprint(&self) -> (Option<&PlaylistId>, u64) {
        (self.playlist_id.as_ref(), self.revision)
    }

    pub fn slide_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs.max(1)))
    }
}
