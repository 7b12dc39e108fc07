//! Final report models

use serde::{Deserialize, Serialize};

use super::{LandCoverageRecord, PlantRecommendation, SeasonContext, WeatherSnapshot};

/// Where the analysis was requested for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Everything the pipeline learned about a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalReport {
    pub recommendations: Vec<PlantRecommendation>,
    /// Diagnostic from the recommendation parser, if it recovered nothing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    pub weather_data: WeatherSnapshot,
    pub land_coverage: LandCoverageRecord,
    pub season: SeasonContext,
    pub location: LocationContext,
}
