//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ImageError;

/// A recorded session: every port call made during one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Session name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the binary was built from, or `unknown`.
    pub commit: String,
    /// Calls in the order they happened.
    pub interactions: Vec<Interaction>,
}

/// One port call and its result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Global sequence number.
    pub seq: u64,
    /// Port name, e.g. `image_generator`.
    pub port: String,
    /// Method name, e.g. `generate`.
    pub method: String,
    /// Serialized call input.
    pub input: serde_json::Value,
    /// `{Ok: ...}` or `{Err: ...}`.
    pub output: serde_json::Value,
}

/// How an error is stored so that skippable kinds survive a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordedError {
    /// Replays as [`ImageError::Rejected`].
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error body.
        message: String,
    },
    /// Replays as [`ImageError::Transport`].
    Transport {
        /// HTTP status code.
        status: u16,
        /// Error body.
        message: String,
    },
    /// Any other failure; replays as a fatal error.
    Fatal {
        /// Rendered error message.
        message: String,
    },
}

impl From<&ImageError> for RecordedError {
    fn from(error: &ImageError) -> Self {
        match error {
            ImageError::Rejected { status, message } => {
                Self::Rejected { status: *status, message: message.clone() }
            }
            ImageError::Transport { status, message } => {
                Self::Transport { status: *status, message: message.clone() }
            }
            other => Self::Fatal { message: other.to_string() },
        }
    }
}

impl From<RecordedError> for ImageError {
    fn from(recorded: RecordedError) -> Self {
        match recorded {
            RecordedError::Rejected { status, message } => Self::Rejected { status, message },
            RecordedError::Transport { status, message } => Self::Transport { status, message },
            RecordedError::Fatal { message } => Self::Replay(message),
        }
    }
}
