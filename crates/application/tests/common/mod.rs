#![allow(dead_code)]

use application::files::Upload;
use application::registry::LivenessPolicy;
use application::{ContentStore, FileManager, PlaylistManager, RegistryService, TemplateService};
use domain::event::EventPublisher;
use domain::media::MediaId;
use domain::playlist::ActivationScope;
use domain::storage::StoragePath;
use domain::tv::TvId;
use infrastructure::{
    BroadcastEventPublisher, InMemoryAssignmentRepository, InMemoryFileStore,
    InMemoryMediaRepository, InMemoryPlaylistRepository, InMemoryTemplateRepository,
    InMemoryTvRepository,
};
use std::sync::Arc;

/// All admin services wired to in-memory storage
pub struct Harness {
    pub store: ContentStore,
    pub events: BroadcastEventPublisher,
    pub registry: Arc<RegistryService>,
    pub playlists: Arc<PlaylistManager>,
    pub files: FileManager,
    pub templates: TemplateService,
}

pub fn harness(scope: ActivationScope) -> Harness {
    let store = ContentStore::new(
        Arc::new(InMemoryTvRepository::new()),
        Arc::new(InMemoryMediaRepository::new()),
        Arc::new(InMemoryPlaylistRepository::new()),
        Arc::new(InMemoryAssignmentRepository::new()),
        Arc::new(InMemoryTemplateRepository::new()),
        Arc::new(InMemoryFileStore::new()),
    );
    let events = BroadcastEventPublisher::new();
    let publisher: Arc<dyn EventPublisher> = Arc::new(events.clone());

    let playlists = Arc::new(PlaylistManager::new(store.clone(), publisher.clone(), scope));
    let registry = Arc::new(RegistryService::new(
        store.clone(),
        playlists.clone(),
        publisher.clone(),
        LivenessPolicy::default(),
    ));

    Harness {
        files: FileManager::new(store.clone(), publisher.clone()),
        templates: TemplateService::new(store.clone(), publisher),
        store,
        events,
        registry,
        playlists,
    }
}

impl Harness {
    pub async fn register_tvs(&self, count: usize) -> Vec<TvId> {
        let mut ids = Vec::with_capacity(count);
        for n in 1..=count {
            let tv = self
                .registry
                .register(&format!("TV {n}"), "Recepção Principal")
                .await
                .unwrap();
            ids.push(tv.id().clone());
        }
        ids
    }

    /// Upload files to the root folder and return the registered media ids
    pub async fn upload(&self, names: &[&str]) -> Vec<MediaId> {
        let uploads = names
            .iter()
            .map(|name| Upload::new(*name, name.as_bytes().to_vec()))
            .collect();
        self.files
            .upload(&StoragePath::root(), uploads)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|entry| entry.media_id)
            .collect()
    }
}
