use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::{ContentStore, StorageConfig, StorageResult, join_url, validate_path};

/// Files under a local directory; serve that directory at `public_url`
/// (e.g. `tower_http::services::ServeDir`).
#[derive(Clone, Debug)]
pub struct LocalContentStore {
    config: StorageConfig,
}

impl LocalContentStore {
    pub fn new(config: StorageConfig) -> Self {
        info!(root = %config.root.display(), "Local content store initialized");
        Self { config }
    }

    pub fn root(&self) -> &PathBuf {
        &self.config.root
    }

    pub fn public_url(&self) -> &str {
        &self.config.public_url
    }
}

#[async_trait]
impl ContentStore for LocalContentStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> StorageResult<String> {
        validate_path(path)?;

        let target = self.config.root.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let size = bytes.len();
        tokio::fs::write(&target, bytes).await?;
        debug!(path, size, "Stored content");

        Ok(join_url(&self.config.public_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::new(StorageConfig::new(dir.path(), "/storage"));

        let url = store
            .put("products/abc_1700000000.webp", b"RIFF".to_vec())
            .await
            .unwrap();

        assert_eq!(url, "/storage/products/abc_1700000000.webp");
        let written = std::fs::read(dir.path().join("products/abc_1700000000.webp")).unwrap();
        assert_eq!(written, b"RIFF");
    }

    #[tokio::test]
    async fn test_put_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalContentStore::new(StorageConfig::new(dir.path(), "/storage"));

        assert!(store.put("../outside.webp", vec![1]).await.is_err());
    }
}
