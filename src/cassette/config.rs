//! Cassette locations and loading.

use std::path::{Path, PathBuf};

use super::format::Cassette;
use super::replayer::CassetteReplayer;

/// Directory under which new recordings are written.
pub const CASSETTE_ROOT: &str = ".genimg/cassettes";

/// File name of the generator cassette inside a recording directory.
pub const GENERATOR_CASSETTE: &str = "image_generator.cassette.yaml";

/// Path for a new recording started at `timestamp`.
#[must_use]
pub fn recording_path(root: &Path, timestamp: &str) -> PathBuf {
    root.join(timestamp).join(GENERATOR_CASSETTE)
}

/// Load a cassette file and create a replayer.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_cassette(path: &Path) -> Result<CassetteReplayer, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
    let cassette: Cassette = serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
    Ok(CassetteReplayer::new(&cassette))
}
