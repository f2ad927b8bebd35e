//! Sequential per-image dispatch loop.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::ImageError;
use crate::output::{save_image, unix_timestamp};
use crate::ports::{GenerationRequest, ImageGenerator};

/// An image written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    /// Where the bytes were written.
    pub path: PathBuf,
    /// Remote URL or local marker describing the origin of the bytes.
    pub source: String,
}

/// Result of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The image was generated and saved.
    Saved(SavedImage),
    /// The provider refused or failed this attempt; the loop moved on.
    Skipped {
        /// 1-based attempt number.
        index: u32,
        /// Why the attempt was skipped.
        reason: String,
    },
}

/// Outcomes of a run, in attempt order.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// One entry per attempt.
    pub attempts: Vec<AttemptOutcome>,
}

impl DispatchReport {
    /// Images that were saved.
    pub fn saved(&self) -> impl Iterator<Item = &SavedImage> {
        self.attempts.iter().filter_map(|a| match a {
            AttemptOutcome::Saved(image) => Some(image),
            AttemptOutcome::Skipped { .. } => None,
        })
    }

    /// Paths of the saved images.
    #[must_use]
    pub fn saved_paths(&self) -> Vec<&Path> {
        self.saved().map(|image| image.path.as_path()).collect()
    }

    /// `(index, reason)` for each skipped attempt.
    pub fn skipped(&self) -> impl Iterator<Item = (u32, &str)> {
        self.attempts.iter().filter_map(|a| match a {
            AttemptOutcome::Skipped { index, reason } => Some((*index, reason.as_str())),
            AttemptOutcome::Saved(_) => None,
        })
    }
}

/// Run `request.count` independent generator calls and save each result
/// under `output_dir`.
///
/// Each saved file is printed to stdout as `path: source` as soon as it is
/// written, so the line survives a later fatal error. Rejections and failed
/// synthesis calls are logged and recorded as skipped. Files written before a
/// fatal error stay on disk.
///
/// # Errors
///
/// Returns the first error that is not skippable (network, I/O, malformed
/// response).
pub async fn dispatch(
    generator: &dyn ImageGenerator,
    request: &GenerationRequest,
    output_dir: &Path,
) -> Result<DispatchReport, ImageError> {
    info!(
        "[{}] Generating {} image(s): '{}'",
        request.engine.label(),
        request.count,
        request.prompt
    );

    let mut report = DispatchReport::default();
    for index in 1..=request.count {
        match generator.generate(request).await {
            Ok(payload) => {
                let path = save_image(&payload.data, output_dir, unix_timestamp(), index)?;
                println!("{}: {}", path.display(), payload.source);
                debug!("Image {index}/{} saved", request.count);
                let saved = SavedImage { path, source: payload.source };
                report.attempts.push(AttemptOutcome::Saved(saved));
            }
            Err(e) if e.is_skippable() => {
                error!("Image {index}/{} skipped: {e}", request.count);
                report.attempts.push(AttemptOutcome::Skipped { index, reason: e.to_string() });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}
