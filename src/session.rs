//! # Scan Session
//!
//! High-level orchestration of one scan cycle: acquire a raw image, release
//! the source, normalize to the canonical payload, ask the remote
//! collaborator to identify it. A session processes one cycle at a time
//! (`run` takes `&mut self`); concurrent captures are not defended against.
//!
//! Errors propagate to the caller, which surfaces a message and returns the
//! application to idle. No half-constructed scan survives a failure, and
//! the source is released on every exit path.

use crate::analysis::{RockAnalysis, RockAnalyzer};
use crate::error::{PalError, PalResult};
use crate::normalize::{EncodedImage, Normalizer};
use crate::source::ImageSource;

/// Result of one completed scan cycle, ready to render, save, or export.
#[derive(Debug)]
pub struct ScanOutcome {
    pub image: EncodedImage,
    pub analysis: RockAnalysis,
}

/// Orchestrates acquire → normalize → identify.
pub struct ScanSession {
    source: Box<dyn ImageSource>,
    analyzer: Box<dyn RockAnalyzer>,
    normalizer: Normalizer,
}

impl std::fmt::Debug for ScanSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanSession").finish_non_exhaustive()
    }
}

impl ScanSession {
    /// Create a new scan session using the builder pattern.
    pub fn builder() -> ScanSessionBuilder {
        ScanSessionBuilder::new()
    }

    /// Run one scan cycle.
    pub async fn run(&mut self) -> PalResult<ScanOutcome> {
        self.source.acquire().await?;
        let raw = self.source.next_image().await;

        // Release before the read result is inspected so the resource is
        // never left held on the error path. A release failure must not
        // mask a read failure.
        if let Err(e) = self.source.release().await {
            eprintln!("warning: image source release failed: {}", e);
        }
        let raw = raw?;

        let image = self.normalizer.normalize(&raw)?;
        let analysis = self.analyzer.identify(&image).await?;

        Ok(ScanOutcome { image, analysis })
    }
}

/// Builder for scan sessions with a fluent API.
pub struct ScanSessionBuilder {
    source: Option<Box<dyn ImageSource>>,
    analyzer: Option<Box<dyn RockAnalyzer>>,
    normalizer: Normalizer,
}

impl Default for ScanSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSessionBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            analyzer: None,
            normalizer: Normalizer::new(),
        }
    }

    /// Set the image source for the session.
    pub fn with_source<S: ImageSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Set the analyzer for the session.
    pub fn with_analyzer(mut self, analyzer: Box<dyn RockAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Replace the default normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Build the session with the configured components.
    pub fn build(self) -> PalResult<ScanSession> {
        let source = self
            .source
            .ok_or_else(|| PalError::config("source", "none", "no image source specified"))?;
        let analyzer = self
            .analyzer
            .ok_or_else(|| PalError::config("analyzer", "none", "no analyzer specified"))?;

        Ok(ScanSession {
            source,
            analyzer,
            normalizer: self.normalizer,
        })
    }
}
