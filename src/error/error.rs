use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Malformed upload request: {0}")]
    MalformedRequest(String),

    #[error("Empty person name or no photos provided")]
    InvalidFields,

    #[error("Failed to create storage container {container}: {reason}")]
    ContainerCreateFailure { container: String, reason: String },

    #[error("Failed to upload photo {blob}: {reason}")]
    PhotoWriteFailure { blob: String, reason: String },

    #[error("Unexpected failure: {0}")]
    UnexpectedFailure(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl UploadError {
    /// HTTP status code reported to the caller for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            UploadError::MalformedRequest(_) | UploadError::InvalidFields => 400,
            UploadError::ContainerCreateFailure { .. }
            | UploadError::PhotoWriteFailure { .. }
            | UploadError::UnexpectedFailure(_)
            | UploadError::StorageError(_)
            | UploadError::ConfigError(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

pub type Result<T> = std::result::Result<T, UploadError>;
