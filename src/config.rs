use crate::error::{Result, UploadError};
use std::net::SocketAddr;

pub const CONNECTION_STRING_VAR: &str = "StorageAccountConnectionString";
pub const BIND_ADDRESS_VAR: &str = "UPLOAD_BIND_ADDRESS";
pub const MAX_BODY_BYTES_VAR: &str = "UPLOAD_MAX_BODY_BYTES";
pub const LOG_LEVEL_VAR: &str = "UPLOAD_LOG_LEVEL";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:7071";
const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024 * 1024;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration for the upload service.
#[derive(Clone)]
pub struct UploadConfig {
    pub storage_connection_string: String,
    pub bind_address: SocketAddr,
    pub max_body_bytes: usize,
    pub log_level: String,
}

impl std::fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadConfig")
            .field("storage_connection_string", &"<redacted>")
            .field("bind_address", &self.bind_address)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl UploadConfig {
    pub fn new(storage_connection_string: impl Into<String>) -> Self {
        UploadConfig {
            storage_connection_string: storage_connection_string.into(),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 7071)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_connection_string = lookup(CONNECTION_STRING_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| UploadError::ConfigError(format!("{} not set", CONNECTION_STRING_VAR)))?;

        let bind_address = lookup(BIND_ADDRESS_VAR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| {
                UploadError::ConfigError(format!("Invalid {}: {}", BIND_ADDRESS_VAR, e))
            })?;

        let max_body_bytes = match lookup(MAX_BODY_BYTES_VAR) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                UploadError::ConfigError(format!("Invalid {}: {}", MAX_BODY_BYTES_VAR, e))
            })?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let log_level = lookup(LOG_LEVEL_VAR).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(UploadConfig {
            storage_connection_string,
            bind_address,
            max_body_bytes,
            log_level,
        })
    }
}
