//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, image codec, config, and temp-file errors, and provides
//! semantic variants for argument validation and processing failures.
//!
//! "Nothing to do" situations (no opacity channel, nothing visible) are not errors;
//! they are reported through [`crate::types::SkipReason`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Resize error: {0}")]
    Resize(String),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: usize },

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("External error: {0}")]
    External(String),
}

impl Error {
    pub fn external<E: std::fmt::Display>(e: E) -> Self {
        Error::External(e.to_string())
    }
}
