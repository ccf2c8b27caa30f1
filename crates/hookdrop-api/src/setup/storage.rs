//! Storage setup and initialization

use anyhow::{Context, Result};
use hookdrop_core::Config;
use hookdrop_storage::LocalStorage;

/// Create the uploads root if absent and hand back the storage rooted there.
pub async fn setup_storage(config: &Config) -> Result<LocalStorage> {
    tracing::info!(uploads_dir = %config.uploads_dir().display(), "Initializing local storage...");
    let storage = LocalStorage::new(config.uploads_dir())
        .await
        .context("Failed to prepare uploads directory")?;
    storage
        .check_writable()
        .await
        .context("Uploads directory is not writable")?;
    tracing::info!("Local storage initialized successfully");
    Ok(storage)
}
