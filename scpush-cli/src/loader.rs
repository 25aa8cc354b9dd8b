//! Configuration profile loader
//!
//! Reads the profile from disk and strips every whitespace character so the
//! document can be inlined into the import request as a single token.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration file {} contains no data", path.display())]
    Empty { path: PathBuf },
}

/// Reads and normalizes the profile at `path`
pub async fn load(path: &Path) -> Result<String, LoadError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound {
                path: path.to_path_buf(),
                source,
            },
            _ => LoadError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;

    let payload = normalize(&content);
    if payload.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!(
        "Loaded {} ({} bytes, {} after normalization)",
        path.display(),
        content.len(),
        payload.len()
    );

    Ok(payload)
}

/// Removes all whitespace characters
pub fn normalize(content: &str) -> String {
    content.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_normalize_strips_all_whitespace() {
        assert_eq!(
            normalize("  <SystemConfiguration>\n  <Component FQDD=\"BIOS.Setup.1-1\">\r\n\t</Component>\n</SystemConfiguration>\n"),
            "<SystemConfiguration><ComponentFQDD=\"BIOS.Setup.1-1\"></Component></SystemConfiguration>"
        );
        assert_eq!(normalize("{ \"a\" : 1 }"), "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_load_normalizes_file() {
        let file = profile("  <SystemConfiguration>\n  <Attribute/>\n</SystemConfiguration>\n");

        let payload = load(file.path()).await.unwrap();

        assert_eq!(payload, "<SystemConfiguration><Attribute/></SystemConfiguration>");
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let file = profile("{\n  \"SystemConfiguration\": {\n    \"Components\": []\n  }\n}\n");

        let first = load(file.path()).await.unwrap();
        let second = load(file.path()).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.xml");

        let err = load(&path).await.unwrap_err();

        match err {
            LoadError::NotFound { path: reported, source } => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_whitespace_only_file_is_rejected() {
        let file = profile(" \n\t\n ");

        let err = load(file.path()).await.unwrap_err();

        assert!(matches!(err, LoadError::Empty { .. }));
    }
}
