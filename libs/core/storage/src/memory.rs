use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{ContentStore, StorageResult, join_url, validate_path};

/// Keeps blobs in memory; for tests and ephemeral runs
#[derive(Clone, Default)]
pub struct InMemoryContentStore {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    public_url: String,
}

impl InMemoryContentStore {
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            blobs: Arc::default(),
            public_url: public_url.into(),
        }
    }

    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn put(&self, path: &str, bytes: Vec<u8>) -> StorageResult<String> {
        validate_path(path)?;
        self.blobs.write().await.insert(path.to_string(), bytes);
        Ok(join_url(&self.public_url, path))
    }
}
