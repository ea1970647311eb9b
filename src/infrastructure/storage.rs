use crate::config::StowageConfig;
use crate::error::StowageError;
use crate::services::disk::{LocalDisk, S3Disk, StorageDisk};
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::info;

pub async fn setup_disk(config: &StowageConfig) -> Result<Arc<dyn StorageDisk>, StowageError> {
    match config.disk.as_str() {
        "s3" => {
            let endpoint = require(config.s3_endpoint.as_deref(), "STOWAGE_S3_ENDPOINT")?;
            let bucket = require(config.s3_bucket.as_deref(), "STOWAGE_S3_BUCKET")?;
            let access_key = require(config.s3_access_key.as_deref(), "STOWAGE_S3_ACCESS_KEY")?;
            let secret_key = require(config.s3_secret_key.as_deref(), "STOWAGE_S3_SECRET_KEY")?;

            info!("☁️  S3 disk: {} (Bucket: {})", endpoint, bucket);

            let aws_config = aws_config::from_env()
                .endpoint_url(endpoint)
                .region(Region::new(config.s3_region.clone()))
                .credentials_provider(Credentials::new(
                    access_key, secret_key, None, None, "static",
                ))
                .load()
                .await;

            let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true)
                .build();

            let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
            Ok(Arc::new(S3Disk::new(s3_client, bucket.to_string())))
        }
        _ => {
            info!("📁 Local disk: {}", config.local_root.display());
            tokio::fs::create_dir_all(&config.local_root).await?;
            Ok(Arc::new(LocalDisk::new(config.local_root.clone())))
        }
    }
}

fn require<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str, StowageError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StowageError::MissingConfig(format!("{} must be set", var)))
}
