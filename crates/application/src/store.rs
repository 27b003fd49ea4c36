use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::warn;

use domain::event::{DomainEvent, EventPublisher};
use domain::media::MediaRepository;
use domain::playlist::{AssignmentRepository, PlaylistRepository};
use domain::storage::FileStore;
use domain::template::TemplateRepository;
use domain::tv::TvRepository;

/// The single source of truth shared by the admin services.
///
/// Every mutation that spans more than one record runs under `lock()`, so
/// activation, removal and deletion never interleave.
#[derive(Clone)]
pub struct ContentStore {
    pub tvs: Arc<dyn TvRepository>,
    pub media: Arc<dyn MediaRepository>,
    pub playlists: Arc<dyn PlaylistRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub files: Arc<dyn FileStore>,
    write_lock: Arc<Mutex<()>>,
}

impl ContentStore {
    pub fn new(
        tvs: Arc<dyn TvRepository>,
        media: Arc<dyn MediaRepository>,
        playlists: Arc<dyn PlaylistRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        templates: Arc<dyn TemplateRepository>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            tvs,
            media,
            playlists,
            assignments,
            templates,
            files,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }
}

/// Fire-and-forget publish: a failing subscriber never fails the operation
pub(crate) async fn emit(publisher: &Arc<dyn EventPublisher>, event: DomainEvent) {
    let event_type = event.event_type().to_string();
    if let Err(e) = publisher.publish(event).await {
        warn!(event_type = %event_type, "Failed to publish event: {}", e);
    }
}
