//! # Rock Analysis
//!
//! Typed records for identification results plus the remote collaborator
//! that produces them.
//!
//! The wire schema is a hard contract: a successful response carries every
//! field of [`RockAnalysis`], the four-level economic-value rating, and
//! exactly two alternative candidates. Any deviation is rejected as a
//! malformed result; it never reaches rendering or storage.

use async_trait::async_trait;

use crate::error::PalResult;
use crate::normalize::EncodedImage;

mod gemini;
mod mock;
mod types;

pub use gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiClient};
pub use mock::{MockAnalyzer, pyrite_fixture};
pub use types::{AlternativeRock, EconomicValue, RockAnalysis};

/// Abstract interface to the remote identification collaborator.
/// Enables an offline test double alongside the hosted-model client.
#[async_trait]
pub trait RockAnalyzer: Send + Sync {
    /// Identify the rock or mineral in a canonical image payload.
    ///
    /// # Returns
    ///
    /// A schema-valid [`RockAnalysis`], or an error when the call fails or
    /// the result deviates from the contract.
    async fn identify(&self, image: &EncodedImage) -> PalResult<RockAnalysis>;
}
