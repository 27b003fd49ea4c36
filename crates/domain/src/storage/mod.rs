mod path;
mod store;

pub use path::{StoragePath, validate_name};
pub use store::{FileEntry, FileStore};
