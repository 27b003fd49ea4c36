//! Footnote scroll position.
//!
//! The footnote enters from the right edge of the viewport and travels left
//! until it has fully left the screen, then starts again.

use std::time::Duration;

/// Horizontal offset (in the same unit as the widths) of the footnote text
/// after `elapsed` time.
pub fn footnote_offset(
    elapsed: Duration,
    scroll_secs: u32,
    viewport_width: f64,
    text_width: f64,
) -> f64 {
    let travel = text_width + viewport_width;
    if scroll_secs == 0 || travel <= 0.0 {
        return viewport_width;
    }

    let cycle = f64::from(scroll_secs);
    let progress = (elapsed.as_secs_f64() % cycle) / cycle;
    viewport_width - progress * travel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_right_edge() {
        assert_eq!(footnote_offset(Duration::ZERO, 10, 1920.0, 480.0), 1920.0);
    }

    #[test]
    fn test_halfway() {
        let offset = footnote_offset(Duration::from_secs(5), 10, 1920.0, 480.0);
        assert_eq!(offset, 1920.0 - 1200.0);
    }

    #[test]
    fn test_restarts_each_cycle() {
        let first = footnote_offset(Duration::from_secs(3), 10, 1000.0, 200.0);
        let next = footnote_offset(Duration::from_secs(13), 10, 1000.0, 200.0);
        assert!((first - next).abs() < 1e-9);
    }
}
