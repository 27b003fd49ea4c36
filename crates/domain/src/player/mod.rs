mod content;
mod playback;
mod ports;
pub mod rotation;
mod state;

pub use content::{Slide, TvContent};
pub use playback::Playback;
pub use ports::{ContentSource, SlideRenderer};
pub use state::PlayerState;
