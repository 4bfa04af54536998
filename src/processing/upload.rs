use crate::{
    error::{Result, UploadError},
    meta::{ContainerName, UploadRequest},
    processing::naming::derive_container_name,
    storage::{BlobStore, ContainerState},
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of writing a single photo.
#[derive(Debug)]
pub struct PhotoWrite {
    pub blob_name: String,
    pub size: usize,
    pub result: Result<()>,
}

impl PhotoWrite {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of an accepted upload. Individual write failures do not change
/// the overall outcome.
#[derive(Debug)]
pub struct UploadReport {
    pub container: ContainerName,
    pub container_state: ContainerState,
    pub writes: Vec<PhotoWrite>,
}

impl UploadReport {
    pub fn written(&self) -> usize {
        self.writes.iter().filter(|w| w.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.writes.len() - self.written()
    }
}

/// Validates upload requests and writes their photos into a per-person container.
#[derive(Clone)]
pub struct UploadHandler {
    store: Arc<dyn BlobStore>,
}

impl UploadHandler {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        UploadHandler { store }
    }

    pub async fn handle(&self, body: &[u8]) -> Result<UploadReport> {
        let request = match UploadRequest::parse(body) {
            Ok(request) => request,
            Err(e) => {
                warn!(
                    content = %String::from_utf8_lossy(body),
                    error = %e,
                    "Could not parse request"
                );
                return Err(e);
            }
        };

        if let Err(e) = request.validate() {
            warn!("Empty person name or no photos provided");
            return Err(e);
        }

        self.upload(request).await
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadReport> {
        info!(
            photos = request.photos.len(),
            bytes = request.total_bytes(),
            person = %request.person_name,
            "Uploading photos to storage"
        );

        let container = derive_container_name(&request.person_name);
        if container.is_generated() {
            debug!(container = %container, "Person name rejected as container name, using generated id");
        }

        let container_state = self.ensure_container(&container).await?;
        let writes = self.write_photos(&container, request.photos).await;

        Ok(UploadReport {
            container,
            container_state,
            writes,
        })
    }

    async fn ensure_container(&self, container: &ContainerName) -> Result<ContainerState> {
        match self
            .store
            .create_container_if_not_exists(container.as_str())
            .await
        {
            Ok(state) => {
                if state == ContainerState::Created {
                    info!(container = %container, "Created storage container");
                }
                Ok(state)
            }
            Err(e) => {
                error!(container = %container, error = %e, "Failed to create storage container");
                Err(UploadError::ContainerCreateFailure {
                    container: container.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    // Sequential, and a failed write never stops the loop.
    async fn write_photos(
        &self,
        container: &ContainerName,
        photos: BTreeMap<String, Option<Vec<u8>>>,
    ) -> Vec<PhotoWrite> {
        let mut writes = Vec::with_capacity(photos.len());

        for (blob_name, content) in photos {
            let size = content.as_ref().map_or(0, Vec::len);
            let result = match content {
                Some(content) => self
                    .store
                    .put_blob(container.as_str(), &blob_name, content)
                    .await
                    .map_err(|e| UploadError::PhotoWriteFailure {
                        blob: blob_name.clone(),
                        reason: e.to_string(),
                    }),
                None => Err(UploadError::PhotoWriteFailure {
                    blob: blob_name.clone(),
                    reason: "photo content is null".into(),
                }),
            };

            match &result {
                Ok(()) => debug!(container = %container, blob = %blob_name, size = size, "Uploaded blob"),
                Err(e) => warn!(container = %container, blob = %blob_name, error = %e, "Failed to upload file"),
            }

            writes.push(PhotoWrite {
                blob_name,
                size,
                result,
            });
        }

        writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBlobStore;

    #[tokio::test]
    async fn test_upload_to_person_container() {
        let store = MemoryBlobStore::new();
        let handler = UploadHandler::new(Arc::new(store.clone()));

        let report = handler
            .handle(br#"{"personName":"Dana","photos":{"x.jpg":[7],"y.jpg":[8,9]}}"#)
            .await
            .unwrap();

        assert_eq!(report.container.as_str(), "dana");
        assert_eq!(report.container_state, ContainerState::Created);
        assert_eq!(report.written(), 2);
        assert_eq!(report.failed(), 0);
        assert_eq!(store.blob("dana", "y.jpg"), Some(vec![8, 9]));
    }

    #[tokio::test]
    async fn test_second_upload_reuses_container() {
        let store = MemoryBlobStore::new();
        let handler = UploadHandler::new(Arc::new(store.clone()));
        let body = br#"{"personName":"Dana","photos":{"x.jpg":[7]}}"#;

        handler.handle(body).await.unwrap();
        let report = handler.handle(body).await.unwrap();

        assert_eq!(report.container_state, ContainerState::AlreadyExists);
        assert_eq!(store.container_names(), vec!["dana".to_string()]);
    }

    #[tokio::test]
    async fn test_rejects_before_touching_storage() {
        let store = MemoryBlobStore::new();
        let handler = UploadHandler::new(Arc::new(store.clone()));

        let malformed = handler.handle(b"{oops").await;
        assert!(matches!(malformed, Err(UploadError::MalformedRequest(_))));

        let empty = handler.handle(br#"{"personName":"Dana","photos":{}}"#).await;
        assert!(matches!(empty, Err(UploadError::InvalidFields)));

        assert!(store.container_names().is_empty());
    }
}
