mod entity;
mod repository;
pub mod ticker;

pub use entity::{
    ContentArea, DEFAULT_FOOTNOTE_SCROLL_SECS, Footnote, Template, TemplateDraft, TemplateId,
};
pub use repository::TemplateRepository;
