use crate::config::StowageConfig;
use crate::error::StowageError;
use crate::models::{FileSource, StoredFile, UploadRequest};
use crate::services::compressor::ImageCompressor;
use crate::services::disk::StorageDisk;
use crate::utils::validation;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Uploads files to a storage disk, optionally compressing images first, and
/// deletes files from that disk.
pub struct Uploader {
    disk: Arc<dyn StorageDisk>,
    compressor: Arc<dyn ImageCompressor>,
    config: StowageConfig,
}

/// The local file handed to the disk. Temp variants are removed on drop, so
/// cleanup happens whether the attempt succeeds or fails.
enum StagedSource {
    Temp(NamedTempFile),
    Original(PathBuf),
}

impl StagedSource {
    fn path(&self) -> &Path {
        match self {
            StagedSource::Temp(temp_file) => temp_file.path(),
            StagedSource::Original(path) => path,
        }
    }
}

impl Uploader {
    pub fn new(
        disk: Arc<dyn StorageDisk>,
        compressor: Arc<dyn ImageCompressor>,
        config: StowageConfig,
    ) -> Self {
        Self {
            disk,
            compressor,
            config,
        }
    }

    /// Upload a file to the disk, returning where it was stored.
    ///
    /// With `compress` set, the bytes go through the compression service
    /// first; an unsupported content type or a missing API key fails the
    /// upload before anything is written to the disk.
    pub async fn upload(&self, request: UploadRequest) -> Result<StoredFile, StowageError> {
        let file_name = resolve_file_name(&request)?;

        let source_size = match &request.source {
            FileSource::Path(path) => tokio::fs::metadata(path).await?.len() as usize,
            FileSource::Uploaded { bytes, .. } => bytes.len(),
        };
        validation::validate_file_size(source_size, self.config.max_file_size)?;

        let mut compressed = false;
        let staged = if request.compress {
            let bytes = self.source_bytes(&request.source).await?;
            let content_type = source_content_type(&request.source, &bytes);
            if !validation::is_compressible_mime(&content_type) {
                return Err(StowageError::UnsupportedMediaType(content_type));
            }

            let extension = Path::new(&file_name)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string);
            let temp_file = self
                .compressor
                .compress(bytes, extension.as_deref())
                .await
                .map_err(|e| match e.downcast::<StowageError>() {
                    Ok(inner) => inner,
                    Err(other) => StowageError::Compression(other),
                })?;
            compressed = true;
            StagedSource::Temp(temp_file)
        } else {
            match &request.source {
                FileSource::Path(path) => StagedSource::Original(path.clone()),
                FileSource::Uploaded { bytes, .. } => {
                    // Stage in-memory uploads so the disk only ever sees a path
                    let temp_file = NamedTempFile::new_in(&self.config.temp_dir)?;
                    tokio::fs::write(temp_file.path(), bytes).await?;
                    StagedSource::Temp(temp_file)
                }
            }
        };

        let size = tokio::fs::metadata(staged.path()).await?.len();
        let path = self
            .disk
            .put_file_as(request.folder.as_deref(), staged.path(), &file_name)
            .await
            .map_err(StowageError::Storage)?;

        tracing::info!(path = %path, size, compressed, "Stored file on disk");

        Ok(StoredFile {
            path,
            size,
            compressed,
        })
        // `staged` drops here; any temp file is removed even on the error paths above
    }

    /// Remove a file from the disk. Deleting a path that does not exist is a
    /// success and contacts nothing beyond the disk itself.
    pub async fn delete(&self, path: &str) -> Result<(), StowageError> {
        if !self
            .disk
            .exists(path)
            .await
            .map_err(StowageError::Storage)?
        {
            tracing::debug!(path = %path, "Delete skipped, file not on disk");
            return Ok(());
        }

        self.disk
            .delete(path)
            .await
            .map_err(StowageError::Storage)?;
        tracing::info!(path = %path, "Deleted file from disk");
        Ok(())
    }

    async fn source_bytes(&self, source: &FileSource) -> Result<Bytes, StowageError> {
        match source {
            FileSource::Path(path) => Ok(Bytes::from(tokio::fs::read(path).await?)),
            FileSource::Uploaded { bytes, .. } => Ok(bytes.clone()),
        }
    }
}

/// Declared content type when the client sent one, sniffed otherwise
fn source_content_type(source: &FileSource, bytes: &Bytes) -> String {
    if let FileSource::Uploaded {
        content_type: Some(content_type),
        ..
    } = source
    {
        return validation::normalize_mime(content_type);
    }

    validation::sniff_mime(bytes)
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Target filename: the explicit one, or the source's own name
fn resolve_file_name(request: &UploadRequest) -> Result<String, StowageError> {
    let raw = match &request.file_name {
        Some(name) => name.clone(),
        None => match &request.source {
            FileSource::Uploaded { original_name, .. } => original_name.clone(),
            FileSource::Path(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| StowageError::InvalidFileName(path.display().to_string()))?,
        },
    };
    validation::sanitize_file_name(&raw)
}
