//! Client for the hosted generative model (Gemini `generateContent` REST
//! surface). Sends the canonical payload inline with an instruction and a
//! JSON response schema, and parses the structured text part back into a
//! [`RockAnalysis`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{PalError, PalResult};
use crate::normalize::EncodedImage;

use super::types::RockAnalysis;
use super::RockAnalyzer;

/// Model used for identification.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Hosted API base.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// No retry on failure; one bounded attempt per user action.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const INSTRUCTION: &str = "Analyze this image. Identify the rock or mineral. Provide economic \
assessment, confidence score (0-100), and list if it is associated with precious metals. If \
uncertain, provide the most likely candidate and then 2 alternatives.";

/// Remote identification client.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the API base, e.g. to point at a local stand-in server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn request_body(&self, image: &EncodedImage) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": image.mime,
                            "data": image.to_base64(),
                        }
                    },
                    { "text": INSTRUCTION }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                // Lower temperature for more factual analysis
                "temperature": 0.4
            }
        })
    }
}

#[async_trait]
impl RockAnalyzer for GeminiClient {
    async fn identify(&self, image: &EncodedImage) -> PalResult<RockAnalysis> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(image))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| PalError::network_with("identify", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PalError::network(format!("identify (HTTP {})", status)));
        }

        let envelope: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PalError::network_with("identify (read body)", e))?;

        let text = envelope["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| PalError::malformed("response carries no text part"))?;

        let analysis: RockAnalysis = serde_json::from_str(text)?;
        analysis.validate()?;
        Ok(analysis)
    }
}

/// Schema definition for structured output, mirrored by [`RockAnalysis`].
fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING", "description": "Common name of the rock or mineral" },
            "scientificName": { "type": "STRING", "description": "Scientific or chemical name" },
            "description": { "type": "STRING", "description": "A brief, interesting description of the mineral (max 2-3 sentences)" },
            "economicValue": {
                "type": "STRING",
                "enum": ["Low", "Moderate", "High", "Very High"],
                "description": "Potential economic value rating"
            },
            "economicDetails": { "type": "STRING", "description": "Explanation of why it has this value (e.g. industrial use, gemstone, ore)" },
            "containsPreciousMetals": { "type": "BOOLEAN", "description": "Does it traditionally contain or indicate gold, silver, copper, etc?" },
            "associatedMetals": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of metals often found with this rock (e.g. Gold, Silver, Copper, Iron)"
            },
            "confidence": {
                "type": "NUMBER",
                "description": "Confidence score of the identification between 0 and 100 based on visual clarity and distinct features."
            },
            "alternatives": {
                "type": "ARRAY",
                "description": "Two other rocks this might be if the identification is wrong",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": { "type": "STRING", "description": "Brief distinction why it looks similar but is different" },
                        "wikiUrl": { "type": "STRING", "description": "Full Wikipedia URL for this alternative" }
                    }
                }
            }
        },
        "required": [
            "name", "scientificName", "description", "economicValue", "economicDetails",
            "containsPreciousMetals", "associatedMetals", "alternatives", "confidence"
        ]
    })
}
