//! Unified error type for genimg.

use thiserror::Error;

/// Errors that can occur while generating and saving images.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The provider rejected the request as malformed (HTTP 400).
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error body returned by the provider.
        message: String,
    },

    /// The synthesis endpoint answered with a non-success status.
    #[error("Synthesis failed ({status}): {message}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// An API returned an error response that cannot be skipped.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// The response carried image data that could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A cassette error replayed from a recording.
    #[error("Replayed error: {0}")]
    Replay(String),
}

impl ImageError {
    /// Whether the dispatcher may skip the current attempt and carry on.
    ///
    /// Only provider rejections and failed synthesis calls qualify; every
    /// other error aborts the run.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Transport { .. })
    }
}
