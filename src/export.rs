//! # Payload Export
//!
//! On save, the canonical payload is also offered to the user as a plain
//! file. The name is deterministic: the identified rock's name lowercased
//! with whitespace collapsed to hyphens, plus the scan timestamp. This is a
//! one-way side effect; callers treat failures as a warning, not a scan
//! failure.

use std::path::{Path, PathBuf};

use crate::error::{PalError, PalResult};
use crate::normalize::EncodedImage;

/// Common prefix of every exported file.
pub const EXPORT_PREFIX: &str = "prospectors-pal";

/// Deterministic export file name for an identified rock.
pub fn export_filename(rock_name: &str, timestamp_ms: u64) -> String {
    format!(
        "{}-{}-{}.jpg",
        EXPORT_PREFIX,
        slugify(rock_name),
        timestamp_ms
    )
}

/// Write the payload bytes into `dir` under the deterministic name.
pub async fn export_scan(
    dir: &Path,
    image: &EncodedImage,
    rock_name: &str,
    timestamp_ms: u64,
) -> PalResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PalError::storage("create_dir", e).with_path(dir.display().to_string()))?;

    let path = dir.join(export_filename(rock_name, timestamp_ms));
    tokio::fs::write(&path, &image.bytes)
        .await
        .map_err(|e| PalError::storage("write", e).with_path(path.display().to_string()))?;
    Ok(path)
}

/// Lowercase, whitespace runs collapsed to single hyphens.
fn slugify(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "specimen".to_string()
    } else {
        slug
    }
}
