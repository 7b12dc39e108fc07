//! Location analysis handler

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use shared::{FinalReport, LocationContext, PipelineResult};
use validator::Validate;

use crate::services::{self, AnalysisRequest, LocationAnalysis};
use crate::AppState;

/// Form body of `POST /analyze-location`
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeLocationForm {
    pub city: String,
    pub country: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default = "default_zoom")]
    #[validate(range(max = 21))]
    pub zoom: u8,
}

fn default_zoom() -> u8 {
    18
}

impl AnalyzeLocationForm {
    fn into_request(self) -> AnalysisRequest {
        AnalysisRequest {
            location: LocationContext {
                city: self.city,
                country: self.country,
                latitude: self.latitude,
                longitude: self.longitude,
            },
            zoom: self.zoom,
        }
    }
}

/// Body returned for every analysis request, successful or not
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub status: &'static str,
    pub message: String,
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_report: Option<FinalReport>,
}

impl AnalysisResponse {
    fn failure(message: String, file_path: Option<String>) -> Self {
        Self {
            status: "error",
            message,
            file_path,
            final_report: None,
        }
    }
}

impl From<PipelineResult<LocationAnalysis>> for AnalysisResponse {
    fn from(result: PipelineResult<LocationAnalysis>) -> Self {
        match result {
            PipelineResult::Success(analysis) => Self {
                status: "success",
                message: "Location analyzed successfully.".to_string(),
                file_path: Some(analysis.file_path.display().to_string()),
                final_report: Some(analysis.report),
            },
            PipelineResult::Error {
                stage,
                message,
                context,
            } => Self::failure(format!("{} failed: {}", stage, message), context.file_path),
        }
    }
}

/// Analyse a location and return its greenery report
pub async fn analyze_location(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeLocationForm>,
) -> Json<AnalysisResponse> {
    if let Err(e) = form.validate() {
        tracing::warn!("Rejected analysis request: {}", e);
        return Json(AnalysisResponse::failure(
            format!("Invalid request: {}", e),
            None,
        ));
    }

    let request = form.into_request();
    tracing::info!(
        "Analyzing {}, {} at ({}, {}) zoom {}",
        request.location.city,
        request.location.country,
        request.location.latitude,
        request.location.longitude,
        request.zoom
    );

    let result =
        services::analyze_location(state.map_provider.as_ref(), &state.pipeline, &request).await;
    Json(AnalysisResponse::from(result))
}
