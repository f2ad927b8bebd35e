//! Live adapter for the `OpenAI` image generation API (DALL-E 3).

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::truncate_body;
use crate::error::ImageError;
use crate::params::DalleBody;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, ImageGenerator, ImagePayload,
};

/// Default API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com";

/// Default model.
pub const DALLE_MODEL: &str = "dall-e-3";

const IMAGES_PATH: &str = "/v1/images/generations";

/// Live DALL-E generator that calls the `OpenAI` Images API and downloads
/// the returned URL.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    /// Create a new generator with the given API key and model.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self { client: Client::new(), api_key, base_url: OPENAI_API_BASE.to_string(), model }
    }

    /// Point the generator at a different API host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl ImageGenerator for OpenAiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let body = DalleBody::new(&self.model, &request.prompt, &request.aspect_ratio);
            let url = format!("{}{IMAGES_PATH}", self.base_url);
            debug!("POST {url} size={}", body.size);

            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;

            if status == StatusCode::BAD_REQUEST {
                return Err(ImageError::Rejected {
                    status: status.as_u16(),
                    message: truncate_body(&response_text),
                });
            }
            if !status.is_success() {
                return Err(ImageError::Api {
                    status: status.as_u16(),
                    message: truncate_body(&response_text),
                });
            }

            let parsed: OpenAiResponse = serde_json::from_str(&response_text).map_err(|e| {
                ImageError::Api { status: 200, message: format!("Failed to parse response: {e}") }
            })?;

            let image_url =
                parsed.data.into_iter().next().and_then(|item| item.url).ok_or_else(|| {
                    ImageError::Api {
                        status: 200,
                        message: format!(
                            "No image URL in response. Body: {}",
                            truncate_body(&response_text)
                        ),
                    }
                })?;

            debug!("Downloading {image_url}");
            let data = self
                .client
                .get(&image_url)
                .send()
                .await?
                .error_for_status()?
                .bytes()
                .await?
                .to_vec();

            Ok(ImagePayload { data, source: image_url })
        })
    }
}

// --- OpenAI API response types ---

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    url: Option<String>,
}
