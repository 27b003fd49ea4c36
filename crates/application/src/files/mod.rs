mod manager;

pub use manager::{FileManager, Upload};
