//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::adapters::live::openai::{DALLE_MODEL, OPENAI_API_BASE};
use crate::adapters::live::stability::{STABILITY_API_BASE, STABILITY_ENGINE};
use crate::model::Engine;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Default parameter values.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// API base URLs.
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// API keys stored in the config file.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// `OpenAI` API key.
    pub openai: Option<String>,
    /// Stability AI API key.
    pub stability: Option<String>,
}

/// Defaults that apply when no flag overrides them.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Directory generated images are written to.
    pub output_dir: PathBuf,
    /// `OpenAI` image model.
    pub dalle_model: String,
    /// Stability engine id.
    pub stability_engine: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("pics"),
            dalle_model: DALLE_MODEL.to_string(),
            stability_engine: STABILITY_ENGINE.to_string(),
        }
    }
}

/// Base URLs for the two APIs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// `OpenAI` API host.
    pub openai: String,
    /// Stability AI API host.
    pub stability: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self { openai: OPENAI_API_BASE.to_string(), stability: STABILITY_API_BASE.to_string() }
    }
}

/// API keys resolved once at startup and handed to the adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Key for the DALL-E engine.
    pub openai: String,
    /// Key for the Stable Diffusion engine.
    pub stability: String,
}

impl Credentials {
    /// Key for the given engine.
    #[must_use]
    pub fn for_engine(&self, engine: Engine) -> &str {
        match engine {
            Engine::Dalle => &self.openai,
            Engine::Stable => &self.stability,
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Resolve API keys, preferring environment variables over the file.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            openai: key_from(Engine::Dalle.key_env_var(), self.keys.openai.as_deref()),
            stability: key_from(Engine::Stable.key_env_var(), self.keys.stability.as_deref()),
        }
    }
}

fn key_from(env_var: &str, file_value: Option<&str>) -> String {
    std::env::var(env_var)
        .ok()
        .filter(|k| !k.is_empty())
        .or_else(|| file_value.map(str::to_string))
        .unwrap_or_default()
}

/// Warn when the selected engine has no key; the API will reject the call.
pub fn warn_if_missing(credentials: &Credentials, engine: Engine) {
    if credentials.for_engine(engine).is_empty() {
        warn!(
            "No API key for {}. Set {} or add it to the config file.",
            engine.label(),
            engine.key_env_var()
        );
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `GENIMG_CONFIG` environment variable
/// 3. `~/.config/genimg/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("GENIMG_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/genimg/config.toml")
    } else {
        PathBuf::from("genimg.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.keys.openai.is_none());
        assert!(config.keys.stability.is_none());
        assert_eq!(config.defaults.output_dir, PathBuf::from("pics"));
        assert_eq!(config.defaults.dalle_model, "dall-e-3");
        assert_eq!(config.defaults.stability_engine, "stable-diffusion-v1-5");
        assert_eq!(config.endpoints.openai, "https://api.openai.com");
        assert_eq!(config.endpoints.stability, "https://api.stability.ai");
    }

    #[test]
    fn load_nonexistent_returns_defaults() {
        let config = Config::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.defaults.dalle_model, "dall-e-3");
    }

    #[test]
    fn load_partial_toml_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[keys]
stability = "sk-file"

[defaults]
output_dir = "/tmp/renders"

[endpoints]
stability = "http://localhost:9999"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.keys.stability.as_deref(), Some("sk-file"));
        assert!(config.keys.openai.is_none());
        assert_eq!(config.defaults.output_dir, PathBuf::from("/tmp/renders"));
        assert_eq!(config.defaults.dalle_model, "dall-e-3");
        assert_eq!(config.endpoints.stability, "http://localhost:9999");
        assert_eq!(config.endpoints.openai, "https://api.openai.com");
    }

    #[test]
    fn load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        assert!(Config::load(&path).unwrap_err().contains("Failed to parse config"));
    }

    #[test]
    fn key_from_prefers_env() {
        std::env::set_var("GENIMG_TEST_KEY_SET", "from-env");
        assert_eq!(key_from("GENIMG_TEST_KEY_SET", Some("from-file")), "from-env");
    }

    #[test]
    fn key_from_falls_back_to_file_then_empty() {
        std::env::remove_var("GENIMG_TEST_KEY_UNSET");
        assert_eq!(key_from("GENIMG_TEST_KEY_UNSET", Some("from-file")), "from-file");
        assert_eq!(key_from("GENIMG_TEST_KEY_UNSET", None), "");
    }

    #[test]
    fn credentials_per_engine() {
        let creds = Credentials { openai: "o".into(), stability: "s".into() };
        assert_eq!(creds.for_engine(Engine::Dalle), "o");
        assert_eq!(creds.for_engine(Engine::Stable), "s");
    }

    #[test]
    fn discover_explicit_path() {
        let path = discover_config_path(Some("/tmp/my-config.toml"));
        assert_eq!(path, PathBuf::from("/tmp/my-config.toml"));
    }
}
