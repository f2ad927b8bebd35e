//! Image generator port for text-to-image APIs.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::model::Engine;

/// A normalized request for one or more images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Which back end serves the request.
    pub engine: Engine,
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Number of images (one call each).
    pub count: u32,
    /// Aspect ratio tag (DALL-E only).
    pub aspect_ratio: String,
    /// Text to steer away from (Stable Diffusion only).
    #[serde(default)]
    pub negative_prompt: Option<String>,
    /// Sampling seed (Stable Diffusion only).
    #[serde(default)]
    pub seed: Option<u32>,
}

/// Image bytes produced by a single generator call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Raw image bytes.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// Where the bytes came from: a remote URL or a local marker.
    pub source: String,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ImagePayload, ImageError>> + Send + 'a>>;

/// Produces one image per call from an external API.
pub trait ImageGenerator: Send + Sync {
    /// Generate a single image for the given request.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64 string.
    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    /// Deserialize base64 string to bytes.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}
