//! Common types used across the pipeline

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{LandCoverageRecord, WeatherSnapshot};

/// Pipeline stage that produced an error result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStage {
    MapAcquisition,
    Captioning,
    CoverageExtraction,
    Validation,
    WeatherFetch,
    RecommendationGeneration,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::MapAcquisition => "map-acquisition",
            PipelineStage::Captioning => "captioning",
            PipelineStage::CoverageExtraction => "coverage-extraction",
            PipelineStage::Validation => "validation",
            PipelineStage::WeatherFetch => "weather-fetch",
            PipelineStage::RecommendationGeneration => "recommendation-generation",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Results already computed when a later stage failed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialContext {
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_coverage: Option<LandCoverageRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_data: Option<WeatherSnapshot>,
}

impl PartialContext {
    pub fn with_file_path(file_path: impl Into<String>) -> Self {
        Self {
            file_path: Some(file_path.into()),
            ..Self::default()
        }
    }
}

/// Tagged outcome of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineResult<T> {
    Success(T),
    Error {
        stage: PipelineStage,
        message: String,
        context: PartialContext,
    },
}

impl<T> PipelineResult<T> {
    pub fn error(
        stage: PipelineStage,
        message: impl Into<String>,
        context: PartialContext,
    ) -> Self {
        PipelineResult::Error {
            stage,
            message: message.into(),
            context,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineResult::Success(_))
    }

    /// Stage of an error result
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineResult::Success(_) => None,
            PipelineResult::Error { stage, .. } => Some(*stage),
        }
    }

    pub fn success(self) -> Option<T> {
        match self {
            PipelineResult::Success(value) => Some(value),
            PipelineResult::Error { .. } => None,
        }
    }

    /// Transform the success payload, passing errors through untouched
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PipelineResult<U> {
        match self {
            PipelineResult::Success(value) => PipelineResult::Success(f(value)),
            PipelineResult::Error {
                stage,
                message,
                context,
            } => PipelineResult::Error {
                stage,
                message,
                context,
            },
        }
    }
}
