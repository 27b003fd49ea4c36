pub mod renderer;
pub mod settings;

pub use renderer::LoggingRenderer;
