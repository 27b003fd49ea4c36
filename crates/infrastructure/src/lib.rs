//! Infrastructure layer - External integrations

pub mod config;
pub mod http;
pub mod messaging;
pub mod repositories;
pub mod storage;

pub use http::HttpContentSource;
pub use messaging::{BroadcastEventPublisher, CompositeEventPublisher, LogEventPublisher};
pub use repositories::{
    InMemoryAssignmentRepository, InMemoryMediaRepository, InMemoryPlaylistRepository,
    InMemoryTemplateRepository, InMemoryTvRepository,
};
pub use storage::InMemoryFileStore;
