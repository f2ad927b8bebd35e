//! Parameter translation between CLI inputs and engine-specific request bodies.

use serde::Serialize;
use tracing::warn;

/// Aspect ratio applied when the requested tag is not supported.
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// Fixed DALL-E 3 resolutions keyed by aspect-ratio tag.
const DALLE_SIZES: &[(&str, &str)] =
    &[("1:1", "1024x1024"), ("16:9", "1792x1024"), ("9:16", "1024x1792")];

/// Look up the DALL-E 3 resolution for an aspect-ratio tag.
#[must_use]
pub fn dalle_size_for(ratio: &str) -> Option<&'static str> {
    DALLE_SIZES.iter().find(|&&(tag, _)| tag == ratio).map(|&(_, size)| size)
}

/// Resolve an aspect-ratio tag to a DALL-E 3 resolution.
///
/// Unsupported tags log a warning and fall back to the square resolution.
#[must_use]
pub fn resolve_dalle_size(ratio: &str) -> &'static str {
    if let Some(size) = dalle_size_for(ratio) {
        return size;
    }
    warn!("Aspect ratio '{ratio}' is not supported, falling back to {DEFAULT_ASPECT_RATIO}");
    dalle_size_for(DEFAULT_ASPECT_RATIO).unwrap_or("1024x1024")
}

/// Body of a DALL-E image generation call.
#[derive(Debug, Serialize)]
pub struct DalleBody<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// Text prompt.
    pub prompt: &'a str,
    /// Images per call; always one.
    pub n: u32,
    /// Resolution string such as `1024x1024`.
    pub size: &'a str,
    /// Quality tier.
    pub quality: &'a str,
}

impl<'a> DalleBody<'a> {
    /// Build a single-image request body at the standard quality tier.
    #[must_use]
    pub fn new(model: &'a str, prompt: &'a str, ratio: &str) -> Self {
        Self { model, prompt, n: 1, size: resolve_dalle_size(ratio), quality: "standard" }
    }
}

/// A weighted entry in a Stability `text_prompts` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPrompt {
    /// Prompt text.
    pub text: String,
    /// Positive weights steer towards the text, negative ones away from it.
    pub weight: f32,
}

/// Body of a Stability text-to-image call.
#[derive(Debug, Clone, Serialize)]
pub struct StabilityPayload {
    /// Prompt list; the first entry is always the main prompt.
    pub text_prompts: Vec<TextPrompt>,
    /// Classifier-free guidance scale.
    pub cfg_scale: u32,
    /// CLIP guidance preset name.
    pub clip_guidance_preset: &'static str,
    /// Output height in pixels.
    pub height: u32,
    /// Output width in pixels.
    pub width: u32,
    /// Images per call.
    pub samples: u32,
    /// Diffusion steps.
    pub steps: u32,
    /// Sampling seed, omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl StabilityPayload {
    /// Build the payload for one synthesis call.
    ///
    /// An empty negative prompt and a zero seed are both treated as absent.
    #[must_use]
    pub fn new(prompt: &str, negative_prompt: Option<&str>, seed: Option<u32>) -> Self {
        let mut text_prompts = vec![TextPrompt { text: prompt.to_string(), weight: 1.0 }];
        if let Some(negative) = negative_prompt.filter(|n| !n.is_empty()) {
            text_prompts.push(TextPrompt { text: negative.to_string(), weight: -1.0 });
        }

        Self {
            text_prompts,
            cfg_scale: 7,
            clip_guidance_preset: "FAST_BLUE",
            height: 512,
            width: 512,
            samples: 1,
            steps: 30,
            seed: seed.filter(|&s| s != 0),
        }
    }
}
