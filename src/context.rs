//! Builds the image generator for the selected mode (live, recording, replaying).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::openai::OpenAiGenerator;
use crate::adapters::live::stability::StabilityGenerator;
use crate::adapters::recording::image_generator::RecordingImageGenerator;
use crate::adapters::replaying::image_generator::ReplayingImageGenerator;
use crate::cassette::config::{load_cassette, recording_path};
use crate::cassette::recorder::CassetteRecorder;
use crate::config::{Config, Credentials};
use crate::error::ImageError;
use crate::model::Engine;
use crate::ports::ImageGenerator;

/// Holds the generator the dispatcher talks to.
pub struct ServiceContext {
    /// Image generator port.
    pub generator: Box<dyn ImageGenerator>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette to disk.
    ///
    /// The context that owns the recording adapter must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        if recorder.is_empty() {
            tracing::debug!("Writing an empty cassette");
        } else {
            tracing::debug!("Writing {} interaction(s)", recorder.len());
        }
        recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Create a live context for the given engine with explicit credentials.
    #[must_use]
    pub fn live(engine: Engine, config: &Config, credentials: &Credentials) -> Self {
        let key = credentials.for_engine(engine).to_string();
        let generator: Box<dyn ImageGenerator> = match engine {
            Engine::Dalle => Box::new(
                OpenAiGenerator::new(key, config.defaults.dalle_model.clone())
                    .with_base_url(&config.endpoints.openai),
            ),
            Engine::Stable => Box::new(
                StabilityGenerator::new(key, config.defaults.stability_engine.clone())
                    .with_base_url(&config.endpoints.stability),
            ),
        };
        Self { generator }
    }

    /// Create a recording context that wraps a live adapter with a recorder.
    ///
    /// The cassette is written under `<cassette_root>/<timestamp>/`.
    #[must_use]
    pub fn recording(
        engine: Engine,
        config: &Config,
        credentials: &Credentials,
        cassette_root: &Path,
    ) -> (Self, RecordingSession) {
        let live_ctx = Self::live(engine, config, credentials);

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = recording_path(cassette_root, &timestamp);
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-{}", engine_slug(engine)),
            get_commit_hash(),
        )));

        let generator = RecordingImageGenerator::new(live_ctx.generator, Arc::clone(&recorder));
        (Self { generator: Box::new(generator) }, RecordingSession { recorder })
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ImageError> {
        let replayer = load_cassette(path)
            .map_err(|e| ImageError::Config(format!("Failed to load cassette: {e}")))?;
        let generator = ReplayingImageGenerator::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { generator: Box::new(generator) })
    }
}

fn engine_slug(engine: Engine) -> &'static str {
    match engine {
        Engine::Dalle => "dalle",
        Engine::Stable => "stable",
    }
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}
