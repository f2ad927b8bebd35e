//! File naming and image saving.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ImageError;

/// Seconds since the Unix epoch, or zero if the clock is before it.
#[must_use]
pub fn unix_timestamp() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

/// Build the filename for the `index`-th image of a run.
///
/// The index suffix keeps names unique when several images share a second.
#[must_use]
pub fn image_filename(timestamp: u64, index: u32) -> String {
    format!("image_{timestamp}_{index}.png")
}

/// Create the output directory (and its parents) if it does not exist.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ImageError> {
    std::fs::create_dir_all(dir).map_err(ImageError::Io)
}

/// Write raw image bytes to `<dir>/image_<timestamp>_<index>.png`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_image(
    data: &[u8],
    dir: &Path,
    timestamp: u64,
    index: u32,
) -> Result<PathBuf, ImageError> {
    let path = dir.join(image_filename(timestamp, index));
    std::fs::write(&path, data).map_err(ImageError::Io)?;
    Ok(path)
}
