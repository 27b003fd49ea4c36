mod activation;
mod assignment;
mod entity;
mod playlist_id;
mod repository;

pub use activation::{ActivationScope, playlists_to_supersede};
pub use assignment::{Assignment, AssignmentRepository};
pub use entity::{
    DEFAULT_SLIDE_DURATION_SECS, MAX_SLIDE_DURATION_SECS, MIN_SLIDE_DURATION_SECS, Playlist,
    PlaylistDraft,
};
pub use playlist_id::PlaylistId;
pub use repository::PlaylistRepository;
