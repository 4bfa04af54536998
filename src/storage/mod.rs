pub mod azure;
pub mod memory;

use crate::error::Result;
use async_trait::async_trait;

pub use azure::{resolve_location, AzureBlobStore};
pub use memory::MemoryBlobStore;

/// Outcome of ensuring a container exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    AlreadyExists,
}

/// Object store keyed by container and blob name.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Create the container if it is absent. An existing container is not an error.
    async fn create_container_if_not_exists(&self, container: &str) -> Result<ContainerState>;

    /// Write a blob, replacing any existing blob with the same name.
    async fn put_blob(&self, container: &str, blob: &str, content: Vec<u8>) -> Result<()>;
}
