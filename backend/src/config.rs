//! Configuration management for the greenery report server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides such as GREENERY__MAPS__API_KEY
//! 4. Legacy key variables (GOOGLE_MAPS_API_KEY, GOOGLE_API_KEY, WEATHERAPI_KEY)
//!
//! API keys are optional at load time. A collaborator whose key is missing
//! reports a configuration error when it is called, so one unconfigured
//! provider does not stop the server from starting.

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Outbound HTTP settings shared by every provider client
    pub http: HttpConfig,

    /// Stored map images
    pub storage: StorageConfig,

    /// Static map provider configuration
    pub maps: MapsConfig,

    /// Vision model used to estimate land coverage
    pub vision: ModelConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,

    /// Text model used to write plant recommendations
    pub text_generation: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory map images are written to and served from
    pub image_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Image size as `WIDTHxHEIGHT`
    pub size: String,
    /// roadmap, satellite, terrain or hybrid
    pub map_type: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Model name, e.g. `gemini-2.5-flash`
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("GREENERY__ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let mut builder = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("http.timeout_secs", 60)?
            .set_default("storage.image_dir", "static_maps")?
            .set_default("maps.base_url", "https://maps.googleapis.com/maps/api/staticmap")?
            .set_default("maps.size", "600x640")?
            .set_default("maps.map_type", "satellite")?
            .set_default("vision.base_url", GEMINI_BASE_URL)?
            .set_default("vision.model", "gemini-2.5-flash")?
            .set_default("weather.base_url", "http://api.weatherapi.com/v1")?
            .set_default("text_generation.base_url", GEMINI_BASE_URL)?
            .set_default("text_generation.model", "gemini-1.5-flash")?;

        // Legacy variable names act as defaults for the keys
        for (key, var) in LEGACY_KEYS {
            if let Some(value) = legacy_var(var) {
                builder = builder.set_default(key, value)?;
            }
        }

        let config = builder
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GREENERY__ prefix, `__` between keys)
            .add_source(
                Environment::with_prefix("GREENERY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Config key and the legacy environment variable that fills it.
/// Vision and text generation share one Gemini key.
const LEGACY_KEYS: [(&str, &str); 4] = [
    ("maps.api_key", "GOOGLE_MAPS_API_KEY"),
    ("vision.api_key", "GOOGLE_API_KEY"),
    ("weather.api_key", "WEATHERAPI_KEY"),
    ("text_generation.api_key", "GOOGLE_API_KEY"),
];

fn legacy_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
