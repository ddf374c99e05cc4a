//! Error types for Mingle API operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring the client or talking to Mingle.
#[derive(Debug, Error)]
pub enum MingleError {
    /// Configuration is missing or incomplete.
    #[error("Mingle configuration required: {0}")]
    ConfigMissing(String),

    /// Configuration file exists but could not be read or written.
    #[error("Configuration file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file exists but is not valid JSON.
    #[error("Configuration file {} is corrupt: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Request could not be signed.
    #[error("Unable to sign request: {0}")]
    Signing(String),

    /// API request failed.
    #[error("Mingle API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Response is not well-formed XML.
    #[error("Malformed XML response: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// Response is well-formed but not a card list.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Result type alias for Mingle operations.
pub type Result<T> = core::result::Result<T, MingleError>;
