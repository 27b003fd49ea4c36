use thiserror::Error;

/// Domain-level errors
///
/// The variants map onto how a caller should react: validation errors are
/// user-correctable, not-found means a stale id, conflicts need a different
/// name or state, transient failures may succeed on retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    /// Only transient failures are worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// Stable machine-readable kind, used by the HTTP layer
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Transient(_) => "transient",
            Self::InvalidConfiguration(_) => "configuration",
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

/// Shared identifier rules: non-empty, at most 100 chars,
/// alphanumeric plus underscore and hyphen.
pub(crate) fn validate_identifier(entity: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(DomainError::Validation(format!(
            "{entity} ID cannot be empty"
        )));
    }

    if id.len() > 100 {
        return Err(DomainError::Validation(format!(
            "{entity} ID too long: {} chars (max 100)",
            id.len()
        )));
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DomainError::Validation(format!(
            "{entity} ID {id} must contain only alphanumeric, underscore, and hyphen"
        )));
    }

    Ok(())
}
