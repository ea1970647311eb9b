use std::env;
use std::path::PathBuf;

/// Configuration for the upload disk and compression service
#[derive(Debug, Clone)]
pub struct StowageConfig {
    /// Disk backend: "local" or "s3" (default: "local")
    pub disk: String,

    /// Root directory for the local disk (default: "./uploads")
    pub local_root: PathBuf,

    /// S3-compatible endpoint URL (required when disk is "s3")
    pub s3_endpoint: Option<String>,

    /// S3 bucket name (required when disk is "s3")
    pub s3_bucket: Option<String>,

    /// S3 access key (required when disk is "s3")
    pub s3_access_key: Option<String>,

    /// S3 secret key (required when disk is "s3")
    pub s3_secret_key: Option<String>,

    /// S3 region (default: "us-east-1")
    pub s3_region: String,

    /// Compressor type: "tinify" or "noop" (default: "tinify")
    pub compressor: String,

    /// API key for the compression service; only needed when a compressing
    /// upload is attempted
    pub tinify_key: Option<String>,

    /// Base URL of the compression service (default: "https://api.tinify.com")
    pub tinify_endpoint: String,

    /// Directory for temporary compressed files (default: system temp dir)
    pub temp_dir: PathBuf,

    /// Maximum file size in bytes (default: 256 MB)
    pub max_file_size: usize,
}

impl Default for StowageConfig {
    fn default() -> Self {
        Self {
            disk: "local".to_string(),
            local_root: PathBuf::from("./uploads"),
            s3_endpoint: None,
            s3_bucket: None,
            s3_access_key: None,
            s3_secret_key: None,
            s3_region: "us-east-1".to_string(),
            compressor: "tinify".to_string(),
            tinify_key: None,
            tinify_endpoint: "https://api.tinify.com".to_string(),
            temp_dir: env::temp_dir(),
            max_file_size: 256 * 1024 * 1024, // 256 MB
        }
    }
}

impl StowageConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            disk: env::var("STOWAGE_DISK").unwrap_or(default.disk),

            local_root: env::var("STOWAGE_LOCAL_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.local_root),

            s3_endpoint: env::var("STOWAGE_S3_ENDPOINT").ok(),

            s3_bucket: env::var("STOWAGE_S3_BUCKET").ok(),

            s3_access_key: env::var("STOWAGE_S3_ACCESS_KEY").ok(),

            s3_secret_key: env::var("STOWAGE_S3_SECRET_KEY").ok(),

            s3_region: env::var("STOWAGE_S3_REGION").unwrap_or(default.s3_region),

            compressor: env::var("STOWAGE_COMPRESSOR").unwrap_or(default.compressor),

            tinify_key: env::var("TINIFY_KEY").ok().filter(|k| !k.is_empty()),

            tinify_endpoint: env::var("TINIFY_ENDPOINT").unwrap_or(default.tinify_endpoint),

            temp_dir: env::var("STOWAGE_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.temp_dir),

            max_file_size: env::var("STOWAGE_MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),
        }
    }

    /// Create config for development (local disk, no real compression)
    pub fn development() -> Self {
        Self {
            compressor: "noop".to_string(),
            ..Self::default()
        }
    }
}
