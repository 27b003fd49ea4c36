use super::rotation::next_index;
use super::{PlayerState, Slide, TvContent};

/// Pure playback state of one TV: the content being shown and where in it.
///
/// Transitions:
/// - `Loading -> Playing { 0 } | Idle` on the first [`Playback::load`]
/// - `Playing { i } -> Playing { i + 1 mod N }` on [`Playback::advance`]
/// - any state -> `Playing { 0 } | Idle` when loaded content changes
#[derive(Debug, Clone, Default)]
pub struct Playback {
    content: Option<TvContent>,
    state: PlayerState,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn content(&self) -> Option<&TvContent> {
        self.content.as_ref()
    }

    /// Returns true when the content differs from what was playing, in which
    /// case playback restarts from the first slide.
    pub fn load(&mut self, content: TvContent) -> bool {
        let unchanged = self
            .content
            .as_ref()
            .is_some_and(|c| c.fingerprint() == content.fingerprint());
        if unchanged {
            return false;
        }

        self.state = if content.is_empty() {
            PlayerState::Idle
        } else {
            PlayerState::Playing { index: 0 }
        };
        self.content = Some(content);
        true
    }

    /// Drop content, e.g. when the TV was removed from the registry
    pub fn clear(&mut self) -> bool {
        let was_idle = self.state == PlayerState::Idle;
        self.content = None;
        self.state = PlayerState::Idle;
        !was_idle
    }

    /// Move to the next slide. Returns false if nothing changed (idle, or a
    /// non-looping playlist holding its last slide).
    pub fn advance(&mut self) -> bool {
        let (PlayerState::Playing { index }, Some(content)) = (self.state, &self.content) else {
            return false;
        };

        match next_index(index, content.slides.len(), content.loop_playback) {
            Some(next) if next != index => {
                self.state = PlayerState::Playing { index: next };
                true
            }
            _ => false,
        }
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        let index = self.state.index()?;
        self.content.as_ref()?.slides.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaType;
    use crate::playlist::PlaylistId;
    use crate::tv::TvId;

    fn content(slides: usize, revision: u64, looped: bool) -> TvContent {
        TvContent {
            playlist_id: Some(PlaylistId::from_sequence(1)),
            revision,
            loop_playback: looped,
            slides: (0..slides)
                .map(|i| Slide {
                    media_type: MediaType::Image,
                    url: format!("/files/slide{i}.jpg"),
                })
                .collect(),
            ..TvContent::empty(TvId::from_sequence(1))
        }
    }

    #[test]
    fn test_loading_to_playing() {
        let mut playback = Playback::new();
        assert_eq!(playback.state(), PlayerState::Loading);

        assert!(playback.load(content(3, 1, true)));
        assert_eq!(playback.state(), PlayerState::Playing { index: 0 });
        assert_eq!(playback.current_slide().unwrap().url, "/files/slide0.jpg");
    }

    #[test]
    fn test_loading_to_idle() {
        let mut playback = Playback::new();
        assert!(playback.load(TvContent::empty(TvId::from_sequence(1))));
        assert_eq!(playback.state(), PlayerState::Idle);
        assert!(!playback.advance());
        assert!(playback.current_slide().is_none());
    }

    #[test]
    fn test_advance_wraps() {
        let mut playback = Playback::new();
        playback.load(content(3, 1, true));

        let mut seen = Vec::new();
        for _ in 0..4 {
            playback.advance();
            seen.push(playback.state().index().unwrap());
        }
        assert_eq!(seen, vec![1, 2, 0, 1]);
    }

    #[test]
    fn test_non_looping_holds() {
        let mut playback = Playback::new();
        playback.load(content(2, 1, false));
        assert!(playback.advance());
        assert!(!playback.advance());
        assert_eq!(playback.state().index(), Some(1));
    }

    #[test]
    fn test_reload_same_revision_keeps_position() {
        let mut playback = Playback::new();
        playback.load(content(3, 1, true));
        playback.advance();

        assert!(!playback.load(content(3, 1, true)));
        assert_eq!(playback.state().index(), Some(1));
    }

    #[test]
    fn test_new_revision_restarts() {
        let mut playback = Playback::new();
        playback.load(content(3, 1, true));
        playback.advance();

        assert!(playback.load(content(3, 2, true)));
        assert_eq!(playback.state().index(), Some(0));
    }

    #[test]
    fn test_single_slide_loop_does_not_report_change() {
        let mut playback = Playback::new();
        playback.load(content(1, 1, true));
        assert!(!playback.advance());
        assert_eq!(playback.state().index(), Some(0));
    }
}
