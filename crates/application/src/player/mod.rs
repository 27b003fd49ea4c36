mod local_source;
mod manager;
mod runtime;

pub use local_source::LocalContentSource;
pub use manager::PlayerManager;
pub use runtime::{PlayerRuntime, PlayerSettings, PlayerSnapshot};
