use anyhow::Result;
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use stowage::services::disk::LocalDisk;
use stowage::{FileSource, ImageCompressor, StowageConfig, StowageError, UploadRequest, Uploader};
use tempfile::{NamedTempFile, TempDir};

/// Compressor that counts how often it is contacted
#[derive(Default)]
struct CountingCompressor {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl ImageCompressor for CountingCompressor {
    async fn compress(&self, bytes: Bytes, _extension: Option<&str>) -> Result<NamedTempFile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let temp_file = NamedTempFile::new()?;
        tokio::fs::write(temp_file.path(), &bytes).await?;
        Ok(temp_file)
    }
}

fn local_uploader(
    root: &TempDir,
    temp: &TempDir,
    compressor: Arc<CountingCompressor>,
) -> Uploader {
    let config = StowageConfig {
        temp_dir: temp.path().to_path_buf(),
        ..StowageConfig::development()
    };
    Uploader::new(Arc::new(LocalDisk::new(root.path())), compressor, config)
}

#[tokio::test]
async fn test_delete_missing_file_is_success_without_compression_call() {
    let root = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    let compressor = Arc::new(CountingCompressor::default());
    let uploader = local_uploader(&root, &temp, compressor.clone());

    uploader.delete("nowhere/nothing.png").await.unwrap();

    assert_eq!(compressor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_delete_removes_existing_file() {
    let root = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    let compressor = Arc::new(CountingCompressor::default());
    let uploader = local_uploader(&root, &temp, compressor.clone());

    let stored = uploader
        .upload(
            UploadRequest::new(FileSource::uploaded(
                &b"bytes"[..],
                "gone-soon.txt",
                Some("text/plain".to_string()),
            ))
            .folder("docs"),
        )
        .await
        .unwrap();

    assert!(root.path().join("docs/gone-soon.txt").exists());

    uploader.delete(&stored.path).await.unwrap();
    assert!(!root.path().join("docs/gone-soon.txt").exists());

    // A second delete of the same path is still a success
    uploader.delete(&stored.path).await.unwrap();
}

#[tokio::test]
async fn test_delete_rejects_paths_escaping_the_disk() {
    let root = tempfile::tempdir().unwrap();
    let temp = tempfile::tempdir().unwrap();
    let compressor = Arc::new(CountingCompressor::default());
    let uploader = local_uploader(&root, &temp, compressor);

    let err = uploader.delete("../outside.txt").await.unwrap_err();
    assert!(matches!(err, StowageError::Storage(_)));
}
