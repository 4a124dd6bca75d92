//! Identification result records, serialized in the camelCase wire form the
//! hosted model is instructed to produce.

use serde::{Deserialize, Serialize};

use crate::error::{PalError, PalResult};

/// Number of alternative candidates a valid analysis must carry.
pub const ALTERNATIVE_COUNT: usize = 2;

/// Economic-value rating, a fixed ordered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EconomicValue {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl std::fmt::Display for EconomicValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
            Self::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// One alternative candidate the specimen might be instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeRock {
    pub name: String,
    /// Short distinction: why it looks similar but is different
    pub description: String,
    pub wiki_url: String,
}

/// Structured identification result produced by the remote collaborator.
/// Treated as opaque, immutable input once validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RockAnalysis {
    /// Common name of the rock or mineral
    pub name: String,
    /// Scientific or chemical name
    pub scientific_name: String,
    /// Brief descriptive text
    pub description: String,
    /// Potential economic value rating
    pub economic_value: EconomicValue,
    /// Why it has this value (industrial use, gemstone, ore)
    pub economic_details: String,
    /// Whether it traditionally contains or indicates precious metals
    pub contains_precious_metals: bool,
    /// Metals often found with this rock; may be empty
    pub associated_metals: Vec<String>,
    /// Exactly two alternative candidates
    pub alternatives: Vec<AlternativeRock>,
    /// Identification confidence in [0, 100]
    pub confidence: f32,
}

impl RockAnalysis {
    /// Enforce the parts of the contract serde cannot express: exactly two
    /// alternatives and a confidence inside [0, 100].
    pub fn validate(&self) -> PalResult<()> {
        if self.alternatives.len() != ALTERNATIVE_COUNT {
            return Err(PalError::malformed(format!(
                "expected {} alternative candidates, got {}",
                ALTERNATIVE_COUNT,
                self.alternatives.len()
            )));
        }
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(PalError::malformed(format!(
                "confidence {} outside [0, 100]",
                self.confidence
            )));
        }
        Ok(())
    }
}
