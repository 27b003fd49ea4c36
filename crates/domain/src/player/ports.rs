use async_trait::async_trait;

use super::{Slide, TvContent};
use crate::DomainError;
use crate::tv::TvId;

/// Where a player gets its content and reports liveness.
///
/// Implementations return `Transient` for failures worth retrying.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_content(&self, tv_id: &TvId) -> Result<TvContent, DomainError>;

    async fn send_heartbeat(&self, tv_id: &TvId) -> Result<(), DomainError>;
}

/// Output device of a player
#[async_trait]
pub trait SlideRenderer: Send + Sync {
    /// `index` is the position of `slide` within `content.slides`
    async fn render(
        &self,
        tv_id: &TvId,
        index: usize,
        slide: &Slide,
        content: &TvContent,
    ) -> Result<(), DomainError>;

    /// Called when there is nothing to show
    async fn show_idle(&self, tv_id: &TvId) -> Result<(), DomainError>;
}
