//! Local storage for downloaded map images

use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::{CollaboratorError, CollaboratorResult};

/// Directory map images are written to and served from
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path for a new map of the given coordinate. A fresh request id in the
    /// name keeps concurrent requests for the same spot apart.
    pub fn map_path(&self, latitude: f64, longitude: f64) -> PathBuf {
        self.root.join(format!(
            "map_{}_{}_{}.png",
            latitude,
            longitude,
            Uuid::new_v4().simple()
        ))
    }

    /// Write image bytes, creating the root on first use
    pub async fn write(&self, path: &Path, bytes: &[u8]) -> CollaboratorResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| CollaboratorError::io(&self.root, e))?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| CollaboratorError::io(path, e))
    }

    /// Resolve a client supplied image name to a file inside the root.
    ///
    /// Names with parent, root or current-dir components are rejected
    /// outright; the canonical path must also stay under the canonical root
    /// so symlinks cannot escape it.
    pub async fn resolve(&self, image_name: &str) -> AppResult<PathBuf> {
        let name = Path::new(image_name);
        let plain = !image_name.is_empty()
            && name.components().all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(AppError::InvalidPath(image_name.to_string()));
        }

        let candidate = self.root.join(name);
        let resolved = match tokio::fs::canonicalize(&candidate).await {
            Ok(path) => path,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound("Image".to_string()))
            }
            Err(e) => return Err(AppError::StorageError(e.to_string())),
        };

        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        if !resolved.starts_with(&root) {
            return Err(AppError::InvalidPath(image_name.to_string()));
        }
        if !resolved.is_file() {
            return Err(AppError::NotFound("Image".to_string()));
        }
        Ok(resolved)
    }
}
