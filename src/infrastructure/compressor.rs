use crate::config::StowageConfig;
use crate::services::compressor::{ImageCompressor, create_compressor};
use std::sync::Arc;
use tracing::info;

pub fn setup_compressor(config: &StowageConfig) -> Arc<dyn ImageCompressor> {
    info!(
        "🗜️  Compressor: {} ({})",
        config.compressor, config.tinify_endpoint
    );
    create_compressor(config)
}
