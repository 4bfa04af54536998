use super::{BlobStore, ContainerState};
use crate::error::{Result, UploadError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Containers = HashMap<String, HashMap<String, Vec<u8>>>;

/// Process-local blob store.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    containers: Arc<Mutex<Containers>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            containers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn with_containers<T>(&self, f: impl FnOnce(&mut Containers) -> T) -> Result<T> {
        let mut containers = self
            .containers
            .lock()
            .map_err(|e| UploadError::StorageError(format!("Failed to acquire lock: {}", e)))?;
        Ok(f(&mut containers))
    }

    pub fn container_names(&self) -> Vec<String> {
        let mut names = self
            .with_containers(|c| c.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn has_container(&self, container: &str) -> bool {
        self.with_containers(|c| c.contains_key(container))
            .unwrap_or(false)
    }

    pub fn blob(&self, container: &str, blob: &str) -> Option<Vec<u8>> {
        self.with_containers(|c| c.get(container).and_then(|blobs| blobs.get(blob)).cloned())
            .ok()
            .flatten()
    }

    pub fn blob_count(&self) -> usize {
        self.with_containers(|c| c.values().map(HashMap::len).sum())
            .unwrap_or(0)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn create_container_if_not_exists(&self, container: &str) -> Result<ContainerState> {
        self.with_containers(|c| {
            if c.contains_key(container) {
                ContainerState::AlreadyExists
            } else {
                c.insert(container.to_string(), HashMap::new());
                ContainerState::Created
            }
        })
    }

    async fn put_blob(&self, container: &str, blob: &str, content: Vec<u8>) -> Result<()> {
        self.with_containers(|c| match c.get_mut(container) {
            Some(blobs) => {
                blobs.insert(blob.to_string(), content);
                Ok(())
            }
            None => Err(UploadError::StorageError(format!(
                "Container not found: {}",
                container
            ))),
        })?
    }
}
