use thiserror::Error;

#[derive(Error, Debug)]
pub enum StowageError {
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Cannot compress {0}")]
    UnsupportedMediaType(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Storage error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("Compression error: {0}")]
    Compression(#[source] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
