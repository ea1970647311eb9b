use crate::config::StowageConfig;
use crate::error::StowageError;
use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Trait for image compression implementations
#[async_trait::async_trait]
pub trait ImageCompressor: Send + Sync {
    /// Compress image bytes into a named temp file the caller owns. The temp
    /// file is removed when the handle is dropped.
    async fn compress(&self, bytes: Bytes, extension: Option<&str>) -> Result<NamedTempFile>;
}

/// Client for the Tinify compression API.
///
/// Protocol: POST the raw image bytes to `{endpoint}/shrink` with basic auth
/// (`api`, key). A 201 response carries the compressed image URL in the
/// `Location` header (and in the JSON body under `output.url`); a second
/// authenticated GET downloads the compressed bytes.
pub struct TinifyCompressor {
    http: reqwest::Client,
    endpoint: String,
    key: Option<String>,
    temp_dir: PathBuf,
}

impl TinifyCompressor {
    pub fn new(key: Option<String>, endpoint: String, temp_dir: PathBuf) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            key,
            temp_dir,
        }
    }
}

#[async_trait::async_trait]
impl ImageCompressor for TinifyCompressor {
    async fn compress(&self, bytes: Bytes, extension: Option<&str>) -> Result<NamedTempFile> {
        // The key is only required once a compressing upload is attempted
        let key = self.key.as_deref().ok_or_else(|| {
            anyhow::Error::new(StowageError::MissingConfig(
                "TINIFY_KEY environment variable is not set".to_string(),
            ))
        })?;

        let res = self
            .http
            .post(format!("{}/shrink", self.endpoint))
            .basic_auth("api", Some(key))
            .body(bytes)
            .send()
            .await
            .context("Compression API unreachable")?;

        let status = res.status();
        if !status.is_success() {
            let message = res
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("Compression API returned {}", status));
            return Err(anyhow!(message));
        }

        let location = res
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let output_url = match location {
            Some(url) => url,
            None => res
                .json::<serde_json::Value>()
                .await
                .context("Unreadable compression API response")?
                .pointer("/output/url")
                .and_then(|u| u.as_str())
                .map(str::to_string)
                .ok_or_else(|| anyhow!("Compression API response missing output url"))?,
        };

        tracing::debug!("Downloading compressed image from {}", output_url);

        let compressed = self
            .http
            .get(&output_url)
            .basic_auth("api", Some(key))
            .send()
            .await
            .context("Failed to download compressed image")?
            .error_for_status()
            .context("Compressed image download rejected")?
            .bytes()
            .await
            .context("Failed to read compressed image body")?;

        let temp_file = temp_image_file(&self.temp_dir, extension)?;
        tokio::fs::write(temp_file.path(), &compressed).await?;
        Ok(temp_file)
    }
}

/// No-op compressor for development/testing: passes bytes through unchanged
pub struct NoOpCompressor {
    temp_dir: PathBuf,
}

impl NoOpCompressor {
    pub fn new(temp_dir: PathBuf) -> Self {
        Self { temp_dir }
    }
}

#[async_trait::async_trait]
impl ImageCompressor for NoOpCompressor {
    async fn compress(&self, bytes: Bytes, extension: Option<&str>) -> Result<NamedTempFile> {
        tracing::warn!("NoOpCompressor: passing file through uncompressed (development mode)");
        let temp_file = temp_image_file(&self.temp_dir, extension)?;
        tokio::fs::write(temp_file.path(), &bytes).await?;
        Ok(temp_file)
    }
}

/// Compressor that always fails (for testing)
#[cfg(test)]
pub struct FailingCompressor;

#[cfg(test)]
#[async_trait::async_trait]
impl ImageCompressor for FailingCompressor {
    async fn compress(&self, _bytes: Bytes, _extension: Option<&str>) -> Result<NamedTempFile> {
        Err(anyhow!("compression service is down"))
    }
}

/// Factory function to create the appropriate compressor based on config
pub fn create_compressor(config: &StowageConfig) -> Arc<dyn ImageCompressor> {
    match config.compressor.to_lowercase().as_str() {
        "tinify" => Arc::new(TinifyCompressor::new(
            config.tinify_key.clone(),
            config.tinify_endpoint.clone(),
            config.temp_dir.clone(),
        )),
        "noop" | "none" | "disabled" => Arc::new(NoOpCompressor::new(config.temp_dir.clone())),
        other => {
            tracing::warn!(
                "Unknown compressor type '{}', using NoOpCompressor",
                other
            );
            Arc::new(NoOpCompressor::new(config.temp_dir.clone()))
        }
    }
}

fn temp_image_file(temp_dir: &std::path::Path, extension: Option<&str>) -> Result<NamedTempFile> {
    let suffix = extension.map(|e| format!(".{}", e)).unwrap_or_default();
    let temp_file = tempfile::Builder::new()
        .prefix("temp-img-")
        .suffix(&suffix)
        .tempfile_in(temp_dir)?;
    Ok(temp_file)
}
