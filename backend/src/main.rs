//! Greenery Report Server
//!
//! Estimates land coverage from a satellite image of a location, combines
//! it with current weather and the local season, and asks a text model for
//! plant recommendations suited to the site.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::{GeminiClient, MapProvider, StaticMapClient, WeatherClient};
use services::{AnalysisPipeline, ImageStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub map_provider: Arc<dyn MapProvider>,
    pub pipeline: Arc<AnalysisPipeline>,
    pub images: ImageStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenery_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Greenery Report Server");
    tracing::info!("Environment: {}", config.environment);

    let state = build_state(&config)?;
    let app = routes::create_app(state);

    let addr = config.bind_address();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the provider clients into the pipeline
fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let http = external::http_client(config.http.timeout_secs)?;
    let images = ImageStore::new(config.storage.image_dir.clone());

    for (setting, key) in [
        ("maps.api_key", &config.maps.api_key),
        ("vision.api_key", &config.vision.api_key),
        ("weather.api_key", &config.weather.api_key),
        ("text_generation.api_key", &config.text_generation.api_key),
    ] {
        if key.is_none() {
            tracing::warn!("{} is not set; requests needing it will fail", setting);
        }
    }

    let maps = StaticMapClient::new(http.clone(), config.maps.clone(), images.clone());
    let vision = GeminiClient::new(
        http.clone(),
        config.vision.api_key.clone(),
        config.vision.base_url.clone(),
        config.vision.model.clone(),
        "vision.api_key",
    );
    let weather = WeatherClient::new(
        http.clone(),
        config.weather.api_key.clone(),
        config.weather.base_url.clone(),
    );
    let generator = GeminiClient::new(
        http,
        config.text_generation.api_key.clone(),
        config.text_generation.base_url.clone(),
        config.text_generation.model.clone(),
        "text_generation.api_key",
    );

    Ok(AppState {
        map_provider: Arc::new(maps),
        pipeline: Arc::new(AnalysisPipeline::new(
            Arc::new(vision),
            Arc::new(weather),
            Arc::new(generator),
        )),
        images,
    })
}
