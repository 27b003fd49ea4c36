use serde::{Deserialize, Serialize};

/// Player runtime state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PlayerState {
    /// Waiting for the first content fetch
    #[default]
    Loading,
    /// Showing the slide at `index`
    Playing { index: usize },
    /// Nothing assigned, or the playlist is empty
    Idle,
}

impl PlayerState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Playing { index } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_loading() {
        assert_eq!(PlayerState::default(), PlayerState::Loading);
        assert_eq!(PlayerState::Loading.index(), None);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(PlayerState::Playing { index: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "playing", "index": 2 }));
        assert!(PlayerState::Playing { index: 0 }.is_playing());
    }
}
