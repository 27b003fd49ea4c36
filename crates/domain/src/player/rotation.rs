//! Time-driven slide rotation.

use std::time::Duration;

/// Index visible after `elapsed` time, starting from slide 0.
///
/// Looping playlists wrap (`floor(t / D) mod N`); non-looping ones hold the
/// last slide.
pub fn index_at(elapsed: Duration, slide_count: usize, slide_duration: Duration, looped: bool) -> usize {
    if slide_count == 0 || slide_duration.is_zero() {
        return 0;
    }

    let steps = (elapsed.as_millis() / slide_duration.as_millis()) as usize;
    if looped {
        steps % slide_count
    } else {
        steps.min(slide_count - 1)
    }
}

/// Index following `index` in a playlist of `slide_count` slides, or `None`
/// when a non-looping playlist is already on its last slide.
pub fn next_index(index: usize, slide_count: usize, looped: bool) -> Option<usize> {
    if slide_count == 0 {
        return None;
    }
    let next = index + 1;
    if next < slide_count {
        Some(next)
    } else if looped {
        Some(0)
    } else {
        None
    }
}
