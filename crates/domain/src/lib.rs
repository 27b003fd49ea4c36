//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Entities (Tv, MediaFile, Playlist, Template)
//! - Value Objects (TvId, PlaylistId, StoragePath, MediaType)
//! - Player state machine and slide rotation math
//! - Domain Events
//! - Repository and port interfaces (traits)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Business rules enforced at domain level
//! - Testable in isolation

pub mod error;
pub mod event;
pub mod media;
pub mod player;
pub mod playlist;
pub mod storage;
pub mod template;
pub mod tv;

// Re-export commonly used types
pub use error::DomainError;
pub use event::DomainEvent;
pub use media::{MediaFile, MediaId, MediaType};
pub use playlist::{Playlist, PlaylistId};
pub use template::{Template, TemplateId};
pub use tv::{Tv, TvId, TvStatus};
