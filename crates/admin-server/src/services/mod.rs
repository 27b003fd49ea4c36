pub mod liveness;

pub use liveness::LivenessMonitor;
