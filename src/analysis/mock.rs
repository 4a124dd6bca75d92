//! Offline analyzer returning a fixed, schema-valid result. Backs the
//! `--mock` CLI flag and the test suites, so the full scan flow can run
//! without an API key or network access.

use async_trait::async_trait;

use crate::error::PalResult;
use crate::normalize::EncodedImage;

use super::types::{AlternativeRock, EconomicValue, RockAnalysis};
use super::RockAnalyzer;

/// A schema-valid pyrite identification.
pub fn pyrite_fixture() -> RockAnalysis {
    RockAnalysis {
        name: "Pyrite".into(),
        scientific_name: "Iron Disulfide".into(),
        description: "Often called 'Fool's Gold', Pyrite is a brass-yellow mineral with a bright \
                      metallic luster. It has a chemical composition of iron sulfide (FeS2) and \
                      is the most common sulfide mineral."
            .into(),
        economic_value: EconomicValue::Low,
        economic_details: "While not valuable for gold content directly, it is used in the \
                           production of sulfur dioxide and sulfuric acid. Historically used in \
                           firearms."
            .into(),
        contains_precious_metals: false,
        associated_metals: vec![
            "Iron".into(),
            "Sulfur".into(),
            "Trace Gold (rarely)".into(),
        ],
        alternatives: vec![
            AlternativeRock {
                name: "Gold".into(),
                description: "A soft, yellow, corrosion-resistant element. Unlike pyrite, gold \
                              is malleable and does not break into cubic shards."
                    .into(),
                wiki_url: "https://en.wikipedia.org/wiki/Gold".into(),
            },
            AlternativeRock {
                name: "Chalcopyrite".into(),
                description: "Similar in color to pyrite but softer and often has a greenish \
                              tinge. It is a major source of copper."
                    .into(),
                wiki_url: "https://en.wikipedia.org/wiki/Chalcopyrite".into(),
            },
        ],
        confidence: 92.0,
    }
}

/// Analyzer that answers every payload with the pyrite fixture.
#[derive(Debug, Default)]
pub struct MockAnalyzer;

#[async_trait]
impl RockAnalyzer for MockAnalyzer {
    async fn identify(&self, _image: &EncodedImage) -> PalResult<RockAnalysis> {
        Ok(pyrite_fixture())
    }
}
