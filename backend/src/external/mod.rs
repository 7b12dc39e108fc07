//! External API integrations
//!
//! Each provider sits behind a narrow async trait so the pipeline can be
//! driven by in-memory fakes in tests. Implementations hold their API key
//! as an `Option` and fail with [`CollaboratorError::Configuration`] before
//! any network call when it is missing.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::WeatherSnapshot;
use thiserror::Error;

pub mod gemini;
pub mod mime;
pub mod static_map;
pub mod weather;

pub use gemini::GeminiClient;
pub use static_map::StaticMapClient;
pub use weather::WeatherClient;

/// Failure of a call to an external collaborator
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{service} request failed: {detail}")]
    Upstream { service: &'static str, detail: String },

    #[error("{service} returned an unexpected response: {detail}")]
    InvalidResponse { service: &'static str, detail: String },

    #[error("Unsupported image type: {0}")]
    UnsupportedMedia(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollaboratorError {
    pub fn missing_key(setting: &str) -> Self {
        CollaboratorError::Configuration(format!("{} is not set", setting))
    }

    /// Transport failure. The URL is dropped since it carries API keys
    /// for providers that take them as query parameters.
    pub fn upstream(service: &'static str, error: reqwest::Error) -> Self {
        CollaboratorError::Upstream {
            service,
            detail: error.without_url().to_string(),
        }
    }

    /// Undecodable response body, with the URL dropped as in [`Self::upstream`]
    pub fn invalid_response(service: &'static str, error: reqwest::Error) -> Self {
        CollaboratorError::InvalidResponse {
            service,
            detail: error.without_url().to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CollaboratorError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// A satellite image written to local storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMap {
    pub file_path: PathBuf,
}

/// Acquires and persists a satellite image of a coordinate
#[async_trait]
pub trait MapProvider: Send + Sync {
    async fn fetch_map(&self, latitude: f64, longitude: f64, zoom: u8)
        -> CollaboratorResult<StoredMap>;
}

/// Vision model that answers a prompt about an image
#[async_trait]
pub trait VisionCaptioner: Send + Sync {
    async fn caption(&self, image_path: &Path, prompt: &str) -> CollaboratorResult<String>;
}

/// Current weather for a named location
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, city: &str) -> CollaboratorResult<WeatherSnapshot>;
}

/// Text model that completes a prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> CollaboratorResult<String>;
}

/// Build the reqwest client every provider uses
pub fn http_client(timeout_secs: u64) -> CollaboratorResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| {
            CollaboratorError::Configuration(format!("Failed to create HTTP client: {}", e))
        })
}
