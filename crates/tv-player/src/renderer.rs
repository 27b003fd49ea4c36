use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use domain::DomainError;
use domain::player::{Slide, SlideRenderer, TvContent};
use domain::tv::TvId;

/// Headless renderer: every slide change becomes a log line
#[derive(Default)]
pub struct LoggingRenderer {
    frames: AtomicU64,
}

impl LoggingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slides and idle screens shown so far
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}

/// One-based position, e.g. `2/3`
fn slide_label(index: usize, total: usize) -> String {
    format!("{}/{}", index + 1, total)
}

#[async_trait]
impl SlideRenderer for LoggingRenderer {
    async fn render(
        &self,
        tv_id: &TvId,
        index: usize,
        slide: &Slide,
        content: &TvContent,
    ) -> Result<(), DomainError> {
        self.frames.fetch_add(1, Ordering::Relaxed);

        let layout = content.template.as_ref().map(|t| t.name.as_str()).unwrap_or("-");
        let footnote = content
            .template
            .as_ref()
            .and_then(|t| t.footnote.as_ref())
            .map(|f| f.text.as_str())
            .unwrap_or("");

        info!(
            tv_id = %tv_id,
            playlist = content.playlist_name.as_deref().unwrap_or("-"),
            slide = %slide_label(index, content.slides.len()),
            kind = slide.media_type.as_str(),
            url = %slide.url,
            layout,
            footnote,
            "▶ Showing slide"
        );
        Ok(())
    }

    async fn show_idle(&self, tv_id: &TvId) -> Result<(), DomainError> {
        self.frames.fetch_add(1, Ordering::Relaxed);
        info!(tv_id = %tv_id, "⏸ Nothing assigned, showing idle screen");
        Ok(())
    }
}
