use serde::{Deserialize, Serialize};

use super::MediaType;

/// Identifier of a stored media file
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata for an uploaded image or video.
///
/// `path` is the public URL path of the stored payload (`/files/...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub id: MediaId,
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub path: String,
}

impl MediaFile {
    pub fn new(id: MediaId, name: impl Into<String>, media_type: MediaType, path: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            media_type,
            path: path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_type_field() {
        let file = MediaFile::new(
            MediaId::new("1"),
            "slide1.jpg",
            MediaType::Image,
            "/files/slide1.jpg",
        );
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["id"], "1");
        assert_eq!(json["path"], "/files/slide1.jpg");
    }
}
