use std::sync::Arc;

use application::registry::LivenessPolicy;
use application::{ContentStore, FileManager, PlaylistManager, RegistryService, TemplateService};
use domain::event::EventPublisher;
use infrastructure::config::ServerConfig;
use infrastructure::{
    BroadcastEventPublisher, CompositeEventPublisher, InMemoryAssignmentRepository,
    InMemoryFileStore, InMemoryMediaRepository, InMemoryPlaylistRepository,
    InMemoryTemplateRepository, InMemoryTvRepository, LogEventPublisher,
};

/// Services shared by every request handler
pub struct AppState {
    pub registry: Arc<RegistryService>,
    pub playlists: Arc<PlaylistManager>,
    pub files: FileManager,
    pub templates: TemplateService,
    /// Source of the `/api/events` stream
    pub events: BroadcastEventPublisher,
}

impl AppState {
    pub fn new(store: ContentStore, config: &ServerConfig) -> Self {
        let events = BroadcastEventPublisher::new();
        let publisher: Arc<dyn EventPublisher> = Arc::new(CompositeEventPublisher::new(vec![
            Arc::new(events.clone()),
            Arc::new(LogEventPublisher),
        ]));

        let playlists = Arc::new(PlaylistManager::new(
            store.clone(),
            publisher.clone(),
            config.activation_scope,
        ));
        let registry = Arc::new(RegistryService::new(
            store.clone(),
            playlists.clone(),
            publisher.clone(),
            LivenessPolicy {
                heartbeat_interval: config.heartbeat_interval(),
                missed_threshold: config.missed_threshold,
            },
        ));

        Self {
            registry,
            playlists,
            files: FileManager::new(store.clone(), publisher.clone()),
            templates: TemplateService::new(store, publisher),
            events,
        }
    }

    /// Everything kept in process memory
    pub fn in_memory(config: &ServerConfig) -> Self {
        let store = ContentStore::new(
            Arc::new(InMemoryTvRepository::new()),
            Arc::new(InMemoryMediaRepository::new()),
            Arc::new(InMemoryPlaylistRepository::new()),
            Arc::new(InMemoryAssignmentRepository::new()),
            Arc::new(InMemoryTemplateRepository::new()),
            Arc::new(InMemoryFileStore::new()),
        );
        Self::new(store, config)
    }
}
