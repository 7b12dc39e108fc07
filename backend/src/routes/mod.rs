//! Route definitions for the greenery report server

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, AppState};

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/analyze-location", post(handlers::analyze_location))
        .route("/analyze-location/", post(handlers::analyze_location))
        .route("/get-image/:image_name", get(handlers::get_image))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
