use photobucket::{
    api::{routes, AppState},
    monitoring,
    storage::AzureBlobStore,
    UploadConfig, UploadHandler,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = UploadConfig::from_env()?;
    monitoring::init_tracing(&config.log_level);

    let store = AzureBlobStore::from_connection_string(&config.storage_connection_string)?;
    info!(account = store.account_name(), "Connected blob store");

    let handler = UploadHandler::new(Arc::new(store));
    let app = routes(AppState::new(handler, config.max_body_bytes));

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!(address = %config.bind_address, "Listening for uploads");
    axum::serve(listener, app).await?;

    Ok(())
}
