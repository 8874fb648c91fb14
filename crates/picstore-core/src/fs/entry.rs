//! Stored file representation.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A single original file in the storage directory.
///
/// The name is taken verbatim from the directory entry so it can be fed
/// straight back into download, rename and delete requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    path: PathBuf,
    name: String,
    size: u64,
}

impl StoredFile {
    /// Creates a new `StoredFile` from a path and its metadata.
    pub fn new(path: PathBuf, metadata: &std::fs::Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            name,
            size: metadata.len(),
        }
    }

    /// Returns the full path of this file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file name (last component of the path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Pixel dimensions of a stored image plus its detected format.
///
/// Serializes as `{"width": .., "height": .., "type": ".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn stored_file_from_regular_file() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("photo.png");
        fs::write(&file_path, "hello").unwrap();

        let metadata = fs::metadata(&file_path).unwrap();
        let file = StoredFile::new(file_path.clone(), &metadata);

        assert_eq!(file.name(), "photo.png");
        assert_eq!(file.size(), 5);
        assert_eq!(file.path(), file_path);
    }

    #[test]
    fn stored_file_keeps_unicode_name() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("חופשה.jpg");
        fs::write(&file_path, "").unwrap();

        let metadata = fs::metadata(&file_path).unwrap();
        let file = StoredFile::new(file_path, &metadata);

        assert_eq!(file.name(), "חופשה.jpg");
        assert_eq!(file.size(), 0);
    }

    #[test]
    fn resolution_serializes_type_field() {
        let res = Resolution {
            width: 640,
            height: 480,
            kind: "png".to_string(),
        };
        let json = serde_json::to_string(&res).unwrap();
        assert_eq!(json, r#"{"width":640,"height":480,"type":"png"}"#);
    }
}
