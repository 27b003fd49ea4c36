use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

const MAX_NAME_LEN: usize = 255;

/// Characters a URL path segment cannot carry literally
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Validate a single folder or file name
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Name cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "Name too long: {} chars (max {MAX_NAME_LEN})",
            name.len()
        )));
    }
    if name == "." || name == ".." {
        return Err(DomainError::Validation(format!("Reserved name: {name}")));
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Err(DomainError::Validation(format!(
            "Name {name:?} contains a path separator or control character"
        )));
    }
    Ok(())
}

/// Normalized absolute path in the file namespace (`/`, `/folder1/sub`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoragePath(Vec<String>);

impl StoragePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Accepts `/a/b`, `a/b/` or `` (root); rejects `..` and friends.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for segment in raw.split('/').filter(|s| !s.is_empty()) {
            validate_name(segment)?;
            segments.push(segment.to_string());
        }
        Ok(Self(segments))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, name: &str) -> Result<Self> {
        validate_name(name)?;
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Ok(Self(segments))
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// True when `self` is `other` or lies beneath it
    pub fn starts_with(&self, other: &StoragePath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// URL path under which the payload is served to players, with every
    /// segment percent-encoded
    pub fn public_url(&self) -> String {
        let mut url = String::from("/files");
        for segment in &self.0 {
            url.push('/');
            url.extend(utf8_percent_encode(segment, SEGMENT));
        }
        url
    }
}

impl std::fmt::Display for StoragePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for StoragePath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<StoragePath> for String {
    fn from(path: StoragePath) -> Self {
        path.to_string()
    }
}
