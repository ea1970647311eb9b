use anyhow::{Result, anyhow};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use std::path::{Component, Path, PathBuf};

/// A named backend that stores files at relative paths
#[async_trait]
pub trait StorageDisk: Send + Sync {
    /// Check whether a file exists at the given relative path
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Remove the file at the given relative path
    async fn delete(&self, path: &str) -> Result<()>;

    /// Store a local file under folder/name, returning the stored relative path
    async fn put_file_as(&self, folder: Option<&str>, file: &Path, name: &str) -> Result<String>;
}

/// Joins folder and name into the disk-relative path an upload returns
pub fn disk_path(folder: Option<&str>, name: &str) -> String {
    match folder.map(|f| f.trim_matches('/')) {
        Some(folder) if !folder.is_empty() => format!("{}/{}", folder, name),
        _ => name.to_string(),
    }
}

/// Disk backed by any S3-compatible object store (MinIO included)
pub struct S3Disk {
    client: Client,
    bucket: String,
}

impl S3Disk {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl StorageDisk for S3Disk {
    async fn exists(&self, path: &str) -> Result<bool> {
        let res = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await;

        match res {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(anyhow!(service_error))
                }
            }
        }
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await?;
        Ok(())
    }

    async fn put_file_as(&self, folder: Option<&str>, file: &Path, name: &str) -> Result<String> {
        let key = disk_path(folder, name);
        let body = ByteStream::from_path(file).await?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .send()
            .await?;
        Ok(key)
    }
}

/// Disk rooted at a local directory
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Joined paths must stay under the root
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let rel = Path::new(path);
        if rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(anyhow!("Path escapes disk root: {}", path));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl StorageDisk for LocalDisk {
    async fn exists(&self, path: &str) -> Result<bool> {
        let target = self.resolve(path)?;
        Ok(tokio::fs::try_exists(&target).await?)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        tokio::fs::remove_file(&target).await?;
        Ok(())
    }

    async fn put_file_as(&self, folder: Option<&str>, file: &Path, name: &str) -> Result<String> {
        let key = disk_path(folder, name);
        let dest = self.resolve(&key)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(file, &dest).await?;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_path() {
        assert_eq!(disk_path(Some("avatars"), "me.jpg"), "avatars/me.jpg");
        assert_eq!(disk_path(Some("/avatars/"), "me.jpg"), "avatars/me.jpg");
        assert_eq!(disk_path(Some(""), "me.jpg"), "me.jpg");
        assert_eq!(disk_path(None, "me.jpg"), "me.jpg");
    }

    #[test]
    fn test_local_disk_rejects_escaping_paths() {
        let disk = LocalDisk::new("/tmp/uploads");
        assert!(disk.resolve("../etc/passwd").is_err());
        assert!(disk.resolve("/etc/passwd").is_err());
        assert!(disk.resolve("a/../../b").is_err());
        assert!(disk.resolve("avatars/me.jpg").is_ok());
    }

    #[tokio::test]
    async fn test_local_disk_roundtrip() {
        let root = tempfile::tempdir().unwrap();
        let disk = LocalDisk::new(root.path());

        let source = root.path().join("source.txt");
        tokio::fs::write(&source, b"hello disk").await.unwrap();

        let key = disk
            .put_file_as(Some("docs"), &source, "hello.txt")
            .await
            .unwrap();
        assert_eq!(key, "docs/hello.txt");
        assert!(disk.exists("docs/hello.txt").await.unwrap());

        let stored = tokio::fs::read(root.path().join("docs/hello.txt"))
            .await
            .unwrap();
        assert_eq!(stored, b"hello disk");

        disk.delete("docs/hello.txt").await.unwrap();
        assert!(!disk.exists("docs/hello.txt").await.unwrap());
    }
}
