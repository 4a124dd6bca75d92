//! # Configuration
//!
//! This module provides the configuration structure and validation shared by
//! the CLI and the library entry points. Defaults reproduce the canonical
//! pipeline limits; everything is overridable for tests and local stand-in
//! servers.
//!
//! | Parameter | Default | Description |
//! |-----------|---------|-------------|
//! | `gallery_path` | `prospector_scans.json` | Persisted collection file |
//! | `export_dir` | `.` | Destination of exported payload files |
//! | `endpoint` | Gemini v1beta base | Remote collaborator API base |
//! | `model` | `gemini-2.5-flash` | Identification model |
//! | `max_upload_bytes` | 50 MiB | Hard byte ceiling on raw inputs |
//! | `max_dimension` | 1500 | Longest edge of the canonical payload |
//! | `jpeg_quality` | 85 | Canonical encode quality |
//!
//! The API key is read from `GEMINI_API_KEY`, falling back to `API_KEY`.

use std::path::PathBuf;

use crate::analysis::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiClient, MockAnalyzer, RockAnalyzer};
use crate::error::{PalError, PalResult};
use crate::gallery::{DEFAULT_GALLERY_FILE, FsStorage};
use crate::normalize::{JPEG_QUALITY, MAX_DIMENSION, MAX_UPLOAD_BYTES, Normalizer};

/// Configuration for the scan pipeline and its collaborators.
#[derive(Debug, Clone)]
pub struct PalConfig {
    /// Persisted gallery collection file
    pub gallery_path: PathBuf,
    /// Directory exported payload files land in
    pub export_dir: PathBuf,
    /// Remote collaborator API key, if configured
    pub api_key: Option<String>,
    /// Remote collaborator API base
    pub endpoint: String,
    /// Identification model name
    pub model: String,
    /// Hard byte ceiling on raw inputs
    pub max_upload_bytes: u64,
    /// Longest edge of the canonical payload, in pixels
    pub max_dimension: u32,
    /// Canonical JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for PalConfig {
    fn default() -> Self {
        Self {
            gallery_path: PathBuf::from(DEFAULT_GALLERY_FILE),
            export_dir: PathBuf::from("."),
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            max_dimension: MAX_DIMENSION,
            jpeg_quality: JPEG_QUALITY,
        }
    }
}

impl PalConfig {
    /// Defaults plus the API key from the environment.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok(),
            ..Self::default()
        }
    }

    /// Validate parameter ranges with field-level error messages.
    pub fn validate(&self) -> PalResult<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(PalError::config(
                "jpeg_quality",
                self.jpeg_quality.to_string(),
                "must be between 1 and 100",
            ));
        }
        if self.max_dimension == 0 {
            return Err(PalError::config(
                "max_dimension",
                "0",
                "must be at least 1 pixel",
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(PalError::config(
                "max_upload_bytes",
                "0",
                "must be at least 1 byte",
            ));
        }
        if self.endpoint.is_empty() {
            return Err(PalError::config("endpoint", "", "must not be empty"));
        }
        Ok(())
    }

    /// Normalizer honoring the configured limits.
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::with_limits(self.max_dimension, self.jpeg_quality)
    }

    /// File-backed storage for the gallery collection.
    pub fn storage(&self) -> FsStorage {
        FsStorage::new(&self.gallery_path)
    }

    /// The configured analyzer: the hosted model, or the offline mock.
    pub fn analyzer(&self, mock: bool) -> PalResult<Box<dyn RockAnalyzer>> {
        if mock {
            return Ok(Box::new(MockAnalyzer));
        }
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            PalError::config(
                "api_key",
                "unset",
                "set GEMINI_API_KEY (or API_KEY), or pass --mock",
            )
        })?;
        Ok(Box::new(
            GeminiClient::new(api_key)
                .with_endpoint(self.endpoint.clone())
                .with_model(self.model.clone()),
        ))
    }
}
