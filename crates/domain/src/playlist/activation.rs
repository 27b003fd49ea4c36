use serde::{Deserialize, Serialize};

use super::{Playlist, PlaylistId};

/// Which other playlists are switched off when one is activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivationScope {
    /// Only active playlists sharing at least one target TV
    #[default]
    Overlapping,
    /// Every other active playlist (legacy single-playlist behaviour)
    Global,
}

/// Active playlists that must be deactivated before `activating` goes live.
pub fn playlists_to_supersede(
    activating: &Playlist,
    others: &[Playlist],
    scope: ActivationScope,
) -> Vec<PlaylistId> {
    others
        .iter()
        .filter(|p| p.id() != activating.id() && p.is_active())
        .filter(|p| match scope {
            ActivationScope::Global => true,
            ActivationScope::Overlapping => p.overlaps(activating),
        })
        .map(|p| p.id().clone())
        .collect()
}
