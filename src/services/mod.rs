pub mod compressor;
pub mod disk;
pub mod uploader;
