use bytes::Bytes;
use serde::Serialize;
use std::path::PathBuf;

/// Where the bytes to store come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// A file already on the local filesystem.
    Path(PathBuf),
    /// An uploaded file held in memory, e.g. a multipart part.
    Uploaded {
        bytes: Bytes,
        original_name: String,
        content_type: Option<String>,
    },
}

impl FileSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn uploaded(
        bytes: impl Into<Bytes>,
        original_name: impl Into<String>,
        content_type: Option<String>,
    ) -> Self {
        Self::Uploaded {
            bytes: bytes.into(),
            original_name: original_name.into(),
            content_type,
        }
    }
}

/// A single upload: a source, an optional target folder and filename, and a
/// compression flag. The filename defaults to the source's own name when not
/// supplied.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub source: FileSource,
    pub folder: Option<String>,
    pub file_name: Option<String>,
    pub compress: bool,
}

impl UploadRequest {
    pub fn new(source: FileSource) -> Self {
        Self {
            source,
            folder: None,
            file_name: None,
            compress: false,
        }
    }

    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }
}

/// What an upload stored on the disk.
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    /// Relative path on the disk, i.e. "folder/file_name"
    pub path: String,
    /// Bytes written (post-compression size when compression ran)
    pub size: u64,
    /// Whether the file went through the compression service
    pub compressed: bool,
}
