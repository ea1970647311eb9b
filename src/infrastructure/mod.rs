pub mod compressor;
pub mod storage;

use crate::config::StowageConfig;
use crate::error::StowageError;
use crate::services::uploader::Uploader;

/// One-call wiring from environment variables to a ready `Uploader`
pub async fn setup_uploader() -> Result<Uploader, StowageError> {
    dotenvy::dotenv().ok();

    let config = StowageConfig::from_env();
    let disk = storage::setup_disk(&config).await?;
    let compressor = compressor::setup_compressor(&config);

    Ok(Uploader::new(disk, compressor, config))
}
