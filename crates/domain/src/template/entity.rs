use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

pub const DEFAULT_FOOTNOTE_SCROLL_SECS: u32 = 10;
const MAX_FOOTNOTE_SCROLL_SECS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Screen region left for slide content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentArea {
    #[default]
    Full,
    Top,
    Bottom,
    Left,
    Right,
}

/// Scrolling text band; `scroll_secs` is the time for one full pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    pub text: String,
    pub scroll_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub footnote: Option<Footnote>,
    #[serde(default = "default_show_clock")]
    pub show_clock: bool,
    #[serde(default)]
    pub content_area: ContentArea,
}

fn default_show_clock() -> bool {
    true
}

/// Slide layout: background, footnote, clock overlay and content area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub background: Option<String>,
    pub footnote: Option<Footnote>,
    pub show_clock: bool,
    pub content_area: ContentArea,
}

impl Template {
    /// The background path, when present, must already be checked against
    /// the media store by the caller.
    pub fn create(id: TemplateId, draft: TemplateDraft) -> Result<Self> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("Template name is required"));
        }

        // An empty footnote text means no footnote at all
        let footnote = match draft.footnote {
            Some(f) if f.text.trim().is_empty() => None,
            Some(f) => {
                if !(1..=MAX_FOOTNOTE_SCROLL_SECS).contains(&f.scroll_secs) {
                    return Err(DomainError::Validation(format!(
                        "Footnote scroll time must be between 1 and {MAX_FOOTNOTE_SCROLL_SECS} seconds"
                    )));
                }
                Some(f)
            }
            None => None,
        };

        Ok(Self {
            id,
            name,
            background: draft.background,
            footnote,
            show_clock: draft.show_clock,
            content_area: draft.content_area,
        })
    }
}
