//! Error types for pixelveil.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pixelveil operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while hiding or revealing a message.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The message to hide is empty.
    #[error("Message cannot be empty")]
    EmptyMessage,

    /// The image does not have enough slots for the payload and its header.
    #[error("Image too small: need {needed} channel slots, have {available}")]
    InsufficientCapacity { needed: usize, available: usize },

    /// Decryption error (wrong key or corrupted data).
    #[error("Decryption failed: wrong key or corrupted data")]
    Decryption,

    /// Encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// No spacing header could be read from the pixel data.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// The extracted payload is not an `iv:ciphertext` hex pair.
    #[error("Invalid ciphertext: {0}")]
    InvalidCipherText(String),

    /// Image decoding or encoding failed.
    #[error("Image error: {0}")]
    Image(String),

    /// Refusing to write a lossy format that would destroy the payload.
    #[error("Output format is lossy and would destroy the hidden message: {0}")]
    LossyOutput(PathBuf),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => Error::Io(io),
            other => Error::Image(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
