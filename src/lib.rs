pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

pub use config::StowageConfig;
pub use error::StowageError;
pub use models::{FileSource, StoredFile, UploadRequest};
pub use services::compressor::ImageCompressor;
pub use services::disk::StorageDisk;
pub use services::uploader::Uploader;
