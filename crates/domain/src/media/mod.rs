mod entity;
mod media_type;
mod repository;

pub use entity::{MediaFile, MediaId};
pub use media_type::MediaType;
pub use repository::MediaRepository;
