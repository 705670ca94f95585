//! Error types used by the crate.

use image::ImageError;
use thiserror::Error;

/// Quakemap error type.
#[derive(Debug, Error)]
pub enum QuakeMapError {
    /// Server answered with a non-success status.
    #[error("request to {url} failed with status {status}")]
    HttpStatus {
        /// Requested url.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// Network level failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Payload is not valid JSON.
    #[error("failed to decode json: {0}")]
    Json(#[from] serde_json::Error),
    /// Payload is valid JSON, but not of the expected shape.
    #[error("invalid feed: {0}")]
    InvalidFeed(String),
    /// Image decoding error.
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] ImageError),
    /// Tile url template cannot be rendered.
    #[error("invalid url template: {0}")]
    UrlTemplate(String),
    /// Item not found.
    #[error("item not found")]
    NotFound,
    /// Error reading/writing data to the FS.
    #[error("file system error: {0}")]
    FsIo(#[from] std::io::Error),
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<strfmt::FmtError> for QuakeMapError {
    fn from(value: strfmt::FmtError) -> Self {
        Self::UrlTemplate(value.to_string())
    }
}
