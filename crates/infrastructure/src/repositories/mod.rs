mod memory;
mod table;

pub use memory::{
    InMemoryAssignmentRepository, InMemoryMediaRepository, InMemoryPlaylistRepository,
    InMemoryTemplateRepository, InMemoryTvRepository,
};
