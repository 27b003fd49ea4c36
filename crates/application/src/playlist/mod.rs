mod manager;

pub use manager::{ActivationOutcome, PlaylistManager, PlaylistRequest};
