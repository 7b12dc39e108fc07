//! Plant recommendation models

use serde::{Deserialize, Serialize};

/// A single recommended plant. Reason and care may be missing when the
/// model output only contained part of a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantRecommendation {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care: Option<String>,
}

/// Recommendations parsed from free text, in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub recommendations: Vec<PlantRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}
