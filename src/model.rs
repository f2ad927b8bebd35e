//! Engine selection.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Supported generation back ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// `OpenAI` Images API with DALL-E 3.
    Dalle,
    /// Stability AI text-to-image REST API.
    Stable,
}

impl Engine {
    /// Human readable label used in log lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dalle => "DALL-E 3",
            Self::Stable => "Stable Diffusion",
        }
    }

    /// Environment variable holding the API key for this engine.
    #[must_use]
    pub fn key_env_var(self) -> &'static str {
        match self {
            Self::Dalle => "OPENAI_API_KEY",
            Self::Stable => "STABILITY_API_KEY",
        }
    }
}
