//! Application layer - Use cases and business workflows

pub mod files;
pub mod player;
pub mod playlist;
pub mod registry;
pub mod retry;
pub mod store;
pub mod template;

pub use files::FileManager;
pub use player::{PlayerManager, PlayerRuntime};
pub use playlist::PlaylistManager;
pub use registry::RegistryService;
pub use store::ContentStore;
pub use template::TemplateService;
