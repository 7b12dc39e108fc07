//! Extraction of land coverage data from vision model output
//!
//! The model is asked to answer with a JSON object inside a ```json fence.
//! Extraction is purely syntactic: the numbers are not range checked here,
//! see [`crate::validation::validate_coverage`].

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::{LandCoverageRecord, COVERAGE_KEYS};

/// Errors raised while pulling a coverage record out of model text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("No valid JSON found in the caption")]
    NoJsonFound,

    #[error("Error decoding JSON: {0}")]
    MalformedJson(String),

    #[error("Coverage JSON is missing keys: {}", .0.join(", "))]
    SchemaMismatch(Vec<String>),
}

const OPEN_FENCE: &str = "```json";
const CLOSE_FENCE: &str = "```";

/// Short key names the model sometimes answers with
const KEY_ALIASES: [(&str, &str); 3] = [
    ("plant_coverage", "vegetation"),
    ("building_coverage", "building"),
    ("road_coverage", "road"),
];

/// Parse the first fenced JSON block of `raw_text` into a coverage record
pub fn extract_coverage(raw_text: &str) -> Result<LandCoverageRecord, ExtractError> {
    let block = find_fenced_json(raw_text).ok_or(ExtractError::NoJsonFound)?;

    let value: Value =
        serde_json::from_str(block).map_err(|e| ExtractError::MalformedJson(e.to_string()))?;

    let object = match value {
        Value::Object(map) => map,
        _ => {
            return Err(ExtractError::SchemaMismatch(
                COVERAGE_KEYS.iter().map(|k| k.to_string()).collect(),
            ))
        }
    };

    let mut values = [0.0_f64; 5];
    let mut missing = Vec::new();
    for (slot, key) in values.iter_mut().zip(COVERAGE_KEYS) {
        match lookup_number(&object, key) {
            Some(v) => *slot = v,
            None => missing.push(key.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(ExtractError::SchemaMismatch(missing));
    }

    let [vegetation, building, road, empty_land, water_body] = values;
    Ok(LandCoverageRecord::new(
        vegetation, building, road, empty_land, water_body,
    ))
}

/// Locate the body of the first ```json ... ``` block.
/// The language tag is matched case-insensitively.
fn find_fenced_json(text: &str) -> Option<&str> {
    let lowered = text.to_ascii_lowercase();
    let open = lowered.find(OPEN_FENCE)?;
    let body_start = open + OPEN_FENCE.len();
    let body_len = text[body_start..].find(CLOSE_FENCE)?;
    Some(text[body_start..body_start + body_len].trim())
}

fn lookup_number(object: &Map<String, Value>, key: &str) -> Option<f64> {
    let alias = KEY_ALIASES
        .iter()
        .find(|(canonical, _)| *canonical == key)
        .map(|(_, alias)| *alias);

    object
        .get(key)
        .or_else(|| alias.and_then(|a| object.get(a)))
        .and_then(Value::as_f64)
}
