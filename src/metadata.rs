//! Loading Knowledge Object metadata descriptors

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{KoError, Result};

/// Load and parse a metadata descriptor from disk.
///
/// A missing file and malformed JSON are both fatal, surfaced with the
/// offending path.
pub fn load_metadata(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| KoError::MetadataLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&content).map_err(|e| KoError::MetadataLoad {
        path: path.display().to_string(),
        reason: format!("invalid JSON: {}", e),
    })
}

/// Look up a string field on the top-level metadata object
pub fn top_level_str<'a>(metadata: &'a Value, key: &str) -> Option<&'a str> {
    metadata.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_metadata() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        fs::write(&path, r#"{"@id": "my-ko", "dc:version": "v1.0"}"#).unwrap();

        let metadata = load_metadata(&path).unwrap();
        assert_eq!(top_level_str(&metadata, "dc:version"), Some("v1.0"));
    }

    #[test]
    fn test_load_metadata_missing_file() {
        let result = load_metadata(Path::new("/nonexistent/metadata.json"));
        assert!(matches!(result, Err(KoError::MetadataLoad { .. })));
    }

    #[test]
    fn test_load_metadata_malformed_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("metadata.json");
        fs::write(&path, "{not json").unwrap();

        let result = load_metadata(&path);
        assert!(matches!(result, Err(KoError::MetadataLoad { .. })));
    }
}
