//! Live adapter for the Stability AI text-to-image API.

use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::truncate_body;
use crate::error::ImageError;
use crate::params::StabilityPayload;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, ImageGenerator, ImagePayload,
};

/// Default API base URL.
pub const STABILITY_API_BASE: &str = "https://api.stability.ai";

/// Default engine id.
pub const STABILITY_ENGINE: &str = "stable-diffusion-v1-5";

/// Live Stable Diffusion generator; the response embeds the image as base64.
pub struct StabilityGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    engine_id: String,
}

impl StabilityGenerator {
    /// Create a new generator with the given API key and engine id.
    #[must_use]
    pub fn new(api_key: String, engine_id: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: STABILITY_API_BASE.to_string(),
            engine_id,
        }
    }

    /// Point the generator at a different API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/generation/{}/text-to-image", self.base_url, self.engine_id)
    }
}

/// Describe locally decoded bytes, which have no remote URL.
fn local_marker(seed: Option<u32>) -> String {
    match seed {
        Some(seed) => format!("local file, seed={seed}"),
        None => "local file, seed=none".to_string(),
    }
}

impl ImageGenerator for StabilityGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let payload = StabilityPayload::new(
                &request.prompt,
                request.negative_prompt.as_deref(),
                request.seed,
            );
            let url = self.endpoint();
            debug!("POST {url} prompts={} seed={:?}", payload.text_prompts.len(), payload.seed);

            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Accept", "application/json")
                .json(&payload)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if status != StatusCode::OK {
                return Err(ImageError::Transport {
                    status: status.as_u16(),
                    message: truncate_body(&response_text),
                });
            }

            let parsed: StabilityResponse = serde_json::from_str(&response_text).map_err(|e| {
                ImageError::Api { status: 200, message: format!("Failed to parse response: {e}") }
            })?;

            let artifact = parsed.artifacts.into_iter().next().ok_or_else(|| ImageError::Api {
                status: 200,
                message: format!("No artifacts in response. Body: {}", truncate_body(&response_text)),
            })?;

            let data = base64::engine::general_purpose::STANDARD
                .decode(&artifact.base64)
                .map_err(|e| ImageError::Decode(format!("Failed to decode base64: {e}")))?;

            Ok(ImagePayload { data, source: local_marker(request.seed) })
        })
    }
}

// --- Stability API response types ---

#[derive(Deserialize)]
struct StabilityResponse {
    artifacts: Vec<StabilityArtifact>,
}

#[derive(Deserialize)]
struct StabilityArtifact {
    base64: String,
}
