//! Services behind the greenery report routes

pub mod pipeline;
pub mod prompts;
pub mod storage;

pub use pipeline::{analyze_location, AnalysisPipeline, AnalysisRequest, LocationAnalysis};
pub use storage::ImageStore;
