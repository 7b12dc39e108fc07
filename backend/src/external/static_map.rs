//! Google Static Maps client
//!
//! Downloads a satellite image centred on a coordinate and writes it under
//! the image root with a per-request unique file name.

use async_trait::async_trait;
use reqwest::Client;

use super::{CollaboratorError, CollaboratorResult, MapProvider, StoredMap};
use crate::config::MapsConfig;
use crate::services::storage::ImageStore;

const SERVICE: &str = "Static Maps API";

/// Static map download client
#[derive(Clone)]
pub struct StaticMapClient {
    client: Client,
    config: MapsConfig,
    store: ImageStore,
}

impl StaticMapClient {
    pub fn new(client: Client, config: MapsConfig, store: ImageStore) -> Self {
        Self {
            client,
            config,
            store,
        }
    }

    fn query(
        &self,
        latitude: f64,
        longitude: f64,
        zoom: u8,
        api_key: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("center", format!("{},{}", latitude, longitude)),
            ("zoom", zoom.to_string()),
            ("size", self.config.size.clone()),
            ("maptype", self.config.map_type.clone()),
            ("key", api_key.to_string()),
        ]
    }
}

#[async_trait]
impl MapProvider for StaticMapClient {
    async fn fetch_map(
        &self,
        latitude: f64,
        longitude: f64,
        zoom: u8,
    ) -> CollaboratorResult<StoredMap> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| CollaboratorError::missing_key("maps.api_key"))?;

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&self.query(latitude, longitude, zoom, api_key))
            .send()
            .await
            .map_err(|e| CollaboratorError::upstream(SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Upstream {
                service: SERVICE,
                detail: format!("Failed to download map: {} - {}", status, body),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CollaboratorError::upstream(SERVICE, e))?;

        let file_path = self.store.map_path(latitude, longitude);
        self.store.write(&file_path, &bytes).await?;

        tracing::info!(
            "Map image saved as {} ({} bytes)",
            file_path.display(),
            bytes.len()
        );
        Ok(StoredMap { file_path })
    }
}
