use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod publisher;
pub use publisher::{EventPublisher, PublishError};

use crate::playlist::PlaylistId;
use crate::template::TemplateId;
use crate::tv::{TvId, TvStatus};

/// Domain events that can occur in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DomainEvent {
    /// A TV was added to the registry
    TvRegistered {
        tv_id: TvId,
        name: String,
        location: String,
        timestamp: DateTime<Utc>,
    },

    /// A TV was removed, together with its assignments
    TvRemoved {
        tv_id: TvId,
        timestamp: DateTime<Utc>,
    },

    /// Online/offline transition (heartbeat recovered or timed out)
    TvStatusChanged {
        tv_id: TvId,
        status: TvStatus,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// Heartbeat received from a player
    TvHeartbeat {
        tv_id: TvId,
        timestamp: DateTime<Utc>,
    },

    PlaylistCreated {
        playlist_id: PlaylistId,
        name: String,
        timestamp: DateTime<Utc>,
    },

    PlaylistUpdated {
        playlist_id: PlaylistId,
        revision: u64,
        timestamp: DateTime<Utc>,
    },

    /// Playlist went live on its target TVs
    PlaylistActivated {
        playlist_id: PlaylistId,
        tv_ids: Vec<TvId>,
        superseded: Vec<PlaylistId>,
        timestamp: DateTime<Utc>,
    },

    PlaylistDeactivated {
        playlist_id: PlaylistId,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    PlaylistDeleted {
        playlist_id: PlaylistId,
        timestamp: DateTime<Utc>,
    },

    /// The playlist a TV plays changed (`None` = nothing assigned)
    AssignmentChanged {
        tv_id: TvId,
        playlist_id: Option<PlaylistId>,
        timestamp: DateTime<Utc>,
    },

    FolderCreated {
        path: String,
        timestamp: DateTime<Utc>,
    },

    FileUploaded {
        path: String,
        size: u64,
        timestamp: DateTime<Utc>,
    },

    FileDeleted {
        path: String,
        timestamp: DateTime<Utc>,
    },

    TemplateCreated {
        template_id: TemplateId,
        name: String,
        timestamp: DateTime<Utc>,
    },

    TemplateDeleted {
        template_id: TemplateId,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn tv_registered(tv_id: TvId, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self::TvRegistered {
            tv_id,
            name: name.into(),
            location: location.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn tv_removed(tv_id: TvId) -> Self {
        Self::TvRemoved {
            tv_id,
            timestamp: Utc::now(),
        }
    }

    pub fn tv_status_changed(tv_id: TvId, status: TvStatus, reason: impl Into<String>) -> Self {
        Self::TvStatusChanged {
            tv_id,
            status,
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn tv_heartbeat(tv_id: TvId, timestamp: DateTime<Utc>) -> Self {
        Self::TvHeartbeat { tv_id, timestamp }
    }

    pub fn playlist_created(playlist_id: PlaylistId, name: impl Into<String>) -> Self {
        Self::PlaylistCreated {
            playlist_id,
            name: name.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn playlist_updated(playlist_id: PlaylistId, revision: u64) -> Self {
        Self::PlaylistUpdated {
            playlist_id,
            revision,
            timestamp: Utc::now(),
        }
    }

    pub fn playlist_activated(
        playlist_id: PlaylistId,
        tv_ids: Vec<TvId>,
        superseded: Vec<PlaylistId>,
    ) -> Self {
        Self::PlaylistActivated {
            playlist_id,
            tv_ids,
            superseded,
            timestamp: Utc::now(),
        }
    }

    pub fn playlist_deactivated(playlist_id: PlaylistId, reason: impl Into<String>) -> Self {
        Self::PlaylistDeactivated {
            playlist_id,
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn playlist_deleted(playlist_id: PlaylistId) -> Self {
        Self::PlaylistDeleted {
            playlist_id,
            timestamp: Utc::now(),
        }
    }

    pub fn assignment_changed(tv_id: TvId, playlist_id: Option<PlaylistId>) -> Self {
        Self::AssignmentChanged {
            tv_id,
            playlist_id,
            timestamp: Utc::now(),
        }
    }

    pub fn folder_created(path: impl Into<String>) -> Self {
        Self::FolderCreated {
            path: path.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn file_uploaded(path: impl Into<String>, size: u64) -> Self {
        Self::FileUploaded {
            path: path.into(),
            size,
            timestamp: Utc::now(),
        }
    }

    pub fn file_deleted(path: impl Into<String>) -> Self {
        Self::FileDeleted {
            path: path.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn template_created(template_id: TemplateId, name: impl Into<String>) -> Self {
        Self::TemplateCreated {
            template_id,
            name: name.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn template_deleted(template_id: TemplateId) -> Self {
        Self::TemplateDeleted {
            template_id,
            timestamp: Utc::now(),
        }
    }

    /// Get the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::TvRegistered { timestamp, .. }
            | Self::TvRemoved { timestamp, .. }
            | Self::TvStatusChanged { timestamp, .. }
            | Self::TvHeartbeat { timestamp, .. }
            | Self::PlaylistCreated { timestamp, .. }
            | Self::PlaylistUpdated { timestamp, .. }
            | Self::PlaylistActivated { timestamp, .. }
            | Self::PlaylistDeactivated { timestamp, .. }
            | Self::PlaylistDeleted { timestamp, .. }
            | Self::AssignmentChanged { timestamp, .. }
            | Self::FolderCreated { timestamp, .. }
            | Self::FileUploaded { timestamp, .. }
            | Self::FileDeleted { timestamp, .. }
            | Self::TemplateCreated { timestamp, .. }
            | Self::TemplateDeleted { timestamp, .. } => *timestamp,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &str {
        match self {
            Self::TvRegistered { .. } => "TvRegistered",
            Self::TvRemoved { .. } => "TvRemoved",
            Self::TvStatusChanged { .. } => "TvStatusChanged",
            Self::TvHeartbeat { .. } => "TvHeartbeat",
            Self::PlaylistCreated { .. } => "PlaylistCreated",
            Self::PlaylistUpdated { .. } => "PlaylistUpdated",
            Self::PlaylistActivated { .. } => "PlaylistActivated",
            Self::PlaylistDeactivated { .. } => "PlaylistDeactivated",
            Self::PlaylistDeleted { .. } => "PlaylistDeleted",
            Self::AssignmentChanged { .. } => "AssignmentChanged",
            Self::FolderCreated { .. } => "FolderCreated",
            Self::FileUploaded { .. } => "FileUploaded",
            Self::FileDeleted { .. } => "FileDeleted",
            Self::TemplateCreated { .. } => "TemplateCreated",
            Self::TemplateDeleted { .. } => "TemplateDeleted",
        }
    }
}
