//! Binary content store for uploaded assets.
//!
//! `put(path, bytes)` persists a blob under a relative path and returns the public URL
//! clients should use to fetch it.
//!
//! ```ignore
//! use core_storage::{ContentStore, LocalContentStore, StorageConfig};
//! use core_config::FromEnv;
//!
//! let store = LocalContentStore::new(StorageConfig::from_env()?);
//! let url = store.put("products/abc_1700000000.webp", bytes).await?;
//! // url == "/storage/products/abc_1700000000.webp"
//! ```

mod config;
mod local;
mod memory;

pub use config::StorageConfig;
pub use local::LocalContentStore;
pub use memory::InMemoryContentStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Write `bytes` at `path` (relative, `/`-separated), replacing any previous blob.
    /// Returns the public URL of the stored blob.
    async fn put(&self, path: &str, bytes: Vec<u8>) -> StorageResult<String>;
}

/// Reject absolute paths and any `..`/empty segment so writes stay under the root
pub(crate) fn validate_path(path: &str) -> StorageResult<()> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");

    if invalid {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// `base` + `/` + `path` without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path_accepts_nested_relative() {
        assert!(validate_path("products/abc_1.webp").is_ok());
    }

    #[test]
    fn test_validate_path_rejects_escapes() {
        for path in ["", "/etc/passwd", "../secret", "products//x", "products/./x", "a\\b"] {
            assert!(validate_path(path).is_err(), "{path} should be rejected");
        }
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("/storage/", "products/a.webp"), "/storage/products/a.webp");
        assert_eq!(
            join_url("https://cdn.example.com", "products/a.webp"),
            "https://cdn.example.com/products/a.webp"
        );
    }
}
