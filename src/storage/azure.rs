use super::{BlobStore, ContainerState};
use crate::error::{Result, UploadError};
use async_trait::async_trait;
use azure_core::error::ErrorKind;
use azure_core::StatusCode;
use azure_storage::{CloudLocation, ConnectionString, EndpointProtocol, StorageCredentials};
use azure_storage_blobs::prelude::*;
use std::fmt;
use tracing::debug;

const EMULATOR_ADDRESS: &str = "127.0.0.1";
const EMULATOR_PORT: u16 = 10000;
const EMULATOR_ACCOUNT: &str = "devstoreaccount1";
// Well-known development storage key, public by design of the emulator.
const EMULATOR_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

const CHINA_ENDPOINT_SUFFIX: &str = "core.chinacloudapi.cn";
const PUBLIC_ENDPOINT_SUFFIX: &str = "core.windows.net";

fn config_error(e: impl fmt::Display) -> UploadError {
    UploadError::ConfigError(format!("Invalid storage connection string: {}", e))
}

/// Pick the account name and blob service location a connection string points at.
pub fn resolve_location(connection: &ConnectionString<'_>) -> Result<(String, CloudLocation)> {
    if connection.use_development_storage == Some(true) {
        return Ok((
            EMULATOR_ACCOUNT.to_string(),
            CloudLocation::Emulator {
                address: EMULATOR_ADDRESS.to_string(),
                port: EMULATOR_PORT,
            },
        ));
    }

    if let Some(endpoint) = connection.blob_endpoint {
        let url = azure_core::Url::parse(endpoint).map_err(config_error)?;
        let host = url
            .host_str()
            .ok_or_else(|| config_error("BlobEndpoint has no host"))?;
        let account = match connection.account_name {
            Some(account) => account.to_string(),
            None => host.split('.').next().unwrap_or(host).to_string(),
        };
        let location = CloudLocation::Custom {
            account: account.clone(),
            uri: endpoint.trim_end_matches('/').to_string(),
        };
        return Ok((account, location));
    }

    let account = connection
        .account_name
        .ok_or_else(|| config_error("missing AccountName"))?
        .to_string();

    let scheme = match connection.default_endpoints_protocol {
        Some(EndpointProtocol::Http) => "http",
        _ => "https",
    };

    let location = match connection.endpoint_suffix {
        Some(suffix) if suffix == CHINA_ENDPOINT_SUFFIX && scheme == "https" => {
            CloudLocation::China {
                account: account.clone(),
            }
        }
        Some(suffix) if suffix != PUBLIC_ENDPOINT_SUFFIX || scheme == "http" => {
            CloudLocation::Custom {
                account: account.clone(),
                uri: format!("{}://{}.blob.{}", scheme, account, suffix),
            }
        }
        None if scheme == "http" => CloudLocation::Custom {
            account: account.clone(),
            uri: format!("http://{}.blob.{}", account, PUBLIC_ENDPOINT_SUFFIX),
        },
        _ => CloudLocation::Public {
            account: account.clone(),
        },
    };

    Ok((account, location))
}

/// Azure Blob Storage backed [`BlobStore`].
#[derive(Clone)]
pub struct AzureBlobStore {
    account_name: String,
    service: BlobServiceClient,
}

impl fmt::Debug for AzureBlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureBlobStore")
            .field("account_name", &self.account_name)
            .finish()
    }
}

impl AzureBlobStore {
    pub fn from_connection_string(connection_string: &str) -> Result<Self> {
        let connection = ConnectionString::new(connection_string).map_err(config_error)?;
        let (account_name, location) = resolve_location(&connection)?;

        let credentials = if connection.use_development_storage == Some(true) {
            StorageCredentials::access_key(EMULATOR_ACCOUNT.to_string(), EMULATOR_KEY.to_string())
        } else {
            connection.storage_credentials().map_err(config_error)?
        };

        debug!(account = %account_name, "Resolved blob service location");

        Ok(AzureBlobStore {
            account_name,
            service: ClientBuilder::with_location(location, credentials).blob_service_client(),
        })
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }
}

fn is_already_exists(err: &azure_core::Error) -> bool {
    match err.kind() {
        ErrorKind::HttpResponse { status, error_code } => match error_code.as_deref() {
            Some(code) => code == "ContainerAlreadyExists",
            None => *status == StatusCode::Conflict,
        },
        _ => false,
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn create_container_if_not_exists(&self, container: &str) -> Result<ContainerState> {
        match self.service.container_client(container).create().await {
            Ok(_) => Ok(ContainerState::Created),
            Err(e) if is_already_exists(&e) => Ok(ContainerState::AlreadyExists),
            Err(e) => Err(UploadError::StorageError(e.to_string())),
        }
    }

    async fn put_blob(&self, container: &str, blob: &str, content: Vec<u8>) -> Result<()> {
        self.service
            .container_client(container)
            .blob_client(blob)
            .put_block_blob(content)
            .await
            .map(|_| ())
            .map_err(|e| UploadError::StorageError(e.to_string()))
    }
}
