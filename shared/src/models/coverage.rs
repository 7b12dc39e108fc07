//! Land coverage models

use serde::{Deserialize, Serialize};

/// Canonical JSON keys of a coverage record, in schema order
pub const COVERAGE_KEYS: [&str; 5] = [
    "plant_coverage",
    "building_coverage",
    "road_coverage",
    "empty_land",
    "water_body",
];

/// Percentage breakdown of a satellite image's area into surface classes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandCoverageRecord {
    #[serde(rename = "plant_coverage")]
    vegetation: f64,
    #[serde(rename = "building_coverage")]
    building: f64,
    #[serde(rename = "road_coverage")]
    road: f64,
    empty_land: f64,
    water_body: f64,
}

impl LandCoverageRecord {
    pub fn new(
        vegetation: f64,
        building: f64,
        road: f64,
        empty_land: f64,
        water_body: f64,
    ) -> Self {
        Self {
            vegetation,
            building,
            road,
            empty_land,
            water_body,
        }
    }

    pub fn vegetation(&self) -> f64 {
        self.vegetation
    }

    pub fn building(&self) -> f64 {
        self.building
    }

    pub fn road(&self) -> f64 {
        self.road
    }

    pub fn empty_land(&self) -> f64 {
        self.empty_land
    }

    pub fn water_body(&self) -> f64 {
        self.water_body
    }

    /// Sum of the four land fields. Water body is not part of the total.
    pub fn land_total(&self) -> f64 {
        self.vegetation + self.building + self.road + self.empty_land
    }

    /// Values paired with their canonical keys, in schema order
    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            (COVERAGE_KEYS[0], self.vegetation),
            (COVERAGE_KEYS[1], self.building),
            (COVERAGE_KEYS[2], self.road),
            (COVERAGE_KEYS[3], self.empty_land),
            (COVERAGE_KEYS[4], self.water_body),
        ]
    }

    /// Render the record the way the vision model is asked to answer:
    /// a JSON object inside a ```json fence.
    pub fn to_fenced_json(&self) -> String {
        let body = serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string());
        format!("```json\n{}\n```", body)
    }
}
