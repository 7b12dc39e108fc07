//! Serves stored map images

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Return a stored map image by file name
pub async fn get_image(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let path = state.images.resolve(&image_name).await?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::StorageError(format!("{}: {}", path.display(), e)))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}
