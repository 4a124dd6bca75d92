//! # Prospector's Pal
//!
//! Identify rocks and minerals from a photo with a hosted generative vision
//! model, and keep a locally persisted collection of past scans.
//!
//! ## Architecture
//!
//! The library is organized around one scan cycle plus a persistence layer:
//! - `source`: raw image acquisition behind an exclusive-resource seam
//! - `normalize`: canonical payload production (bounded size, fixed encode)
//! - `analysis`: typed result records and the remote identification client
//! - `gallery`: the durable, newest-first collection of saved scans
//! - `session`: orchestration of acquire → normalize → identify
//! - `export`: the deterministic downloadable-file side effect
//! - `config`: shared configuration and component wiring
//!
//! ## Example
//!
//! ```rust,no_run
//! use prospector_pal::analysis::MockAnalyzer;
//! use prospector_pal::session::ScanSession;
//! use prospector_pal::source::FileSource;
//! use prospector_pal::normalize::MAX_UPLOAD_BYTES;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = ScanSession::builder()
//!     .with_source(FileSource::new("specimen.jpg", MAX_UPLOAD_BYTES))
//!     .with_analyzer(Box::new(MockAnalyzer))
//!     .build()?;
//!
//! let outcome = session.run().await?;
//! println!("{} ({}%)", outcome.analysis.name, outcome.analysis.confidence);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod gallery;
pub mod normalize;
pub mod session;
pub mod source;
pub mod tips;

/// Re-export error types for convenience
pub use error::{HasRecoverySuggestion, HasSeverity, PalError, PalResult, Recoverable};
