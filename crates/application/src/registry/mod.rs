mod service;

pub use service::{LivenessPolicy, RegistryService};
