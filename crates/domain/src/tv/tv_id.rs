use crate::error::{Result, validate_identifier};
use serde::{Deserialize, Serialize};

/// Value object representing a TV identifier
///
/// Issued by the registry as `TV{n}`; once assigned it never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TvId(String);

impl TvId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_identifier("TV", &id)?;
        Ok(Self(id))
    }

    /// Registry-issued id for the n-th registration
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("TV{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TvId {
    type Error = crate::DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TvId> for String {
    fn from(id: TvId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TvId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
