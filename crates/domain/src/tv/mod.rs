mod entity;
mod repository;
mod status;
mod tv_id;

pub use entity::{NEVER_CONNECTED, Tv};
pub use repository::TvRepository;
pub use status::TvStatus;
pub use tv_id::TvId;
