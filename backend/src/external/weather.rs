//! Weather API client for fetching current conditions
//!
//! Integrates with WeatherAPI.com (`/current.json`)

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{kph_to_mps, WeatherSnapshot};

use super::{CollaboratorError, CollaboratorResult, WeatherProvider};

const SERVICE: &str = "Weather API";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

/// WeatherAPI.com response for current weather
#[derive(Debug, Deserialize)]
struct WapiCurrentResponse {
    location: WapiLocation,
    current: WapiCurrent,
}

#[derive(Debug, Deserialize)]
struct WapiLocation {
    tz_id: String,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WapiCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: f64,
    pressure_mb: f64,
    wind_kph: f64,
    precip_mm: f64,
    uv: f64,
    vis_km: f64,
    condition: WapiCondition,
}

#[derive(Debug, Deserialize)]
struct WapiCondition {
    text: String,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(client: Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch current weather conditions by city name
    pub async fn get_current_weather(&self, city: &str) -> CollaboratorResult<WeatherSnapshot> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CollaboratorError::missing_key("weather.api_key"))?;

        let url = format!("{}/current.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("key", api_key), ("q", city), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| CollaboratorError::upstream(SERVICE, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Upstream {
                service: SERVICE,
                detail: format!("{} - {}", status, body),
            });
        }

        let data: WapiCurrentResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::invalid_response(SERVICE, e))?;

        Ok(convert_current_response(data))
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn current(&self, city: &str) -> CollaboratorResult<WeatherSnapshot> {
        self.get_current_weather(city).await
    }
}

/// Convert a WeatherAPI.com current response to our format
fn convert_current_response(data: WapiCurrentResponse) -> WeatherSnapshot {
    let current = data.current;
    WeatherSnapshot {
        temperature: current.temp_c,
        feels_like: current.feelslike_c,
        humidity: current.humidity,
        pressure: current.pressure_mb,
        wind_speed: kph_to_mps(current.wind_kph),
        precipitation: current.precip_mm,
        uv_index: current.uv,
        visibility: current.vis_km,
        weather_description: current.condition.text,
        local_time: data.location.localtime,
        timezone: data.location.tz_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LUCKNOW: &str = r#"{
        "location": {
            "name": "Lucknow", "region": "Uttar Pradesh", "country": "India",
            "lat": 26.87, "lon": 80.92, "tz_id": "Asia/Kolkata",
            "localtime_epoch": 1721017800, "localtime": "2024-07-15 10:00"
        },
        "current": {
            "temp_c": 31.2, "feelslike_c": 38.4, "humidity": 79, "pressure_mb": 999.0,
            "wind_kph": 18.0, "wind_dir": "E", "precip_mm": 2.4, "uv": 7.0, "vis_km": 5.0,
            "condition": { "text": "Patchy rain nearby", "code": 1063 }
        }
    }"#;

    #[test]
    fn test_convert_current_response() {
        let data: WapiCurrentResponse = serde_json::from_str(LUCKNOW).unwrap();
        let snapshot = convert_current_response(data);

        assert_eq!(snapshot.temperature, 31.2);
        assert_eq!(snapshot.humidity, 79.0);
        assert!((snapshot.wind_speed - 5.0).abs() < 1e-9);
        assert_eq!(snapshot.weather_description, "Patchy rain nearby");
        assert_eq!(snapshot.local_time, "2024-07-15 10:00");
        assert_eq!(snapshot.timezone, "Asia/Kolkata");
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let client = WeatherClient::new(
            Client::new(),
            Some("SECRETKEY123".to_string()),
            "http://127.0.0.1:9".to_string(),
        );
        let err = client.get_current_weather("Lucknow").await.unwrap_err();

        assert!(matches!(err, CollaboratorError::Upstream { .. }));
        assert!(!err.to_string().contains("SECRETKEY123"), "{}", err);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let client = WeatherClient::new(Client::new(), None, "http://127.0.0.1:9".to_string());
        let err = client.get_current_weather("Lucknow").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Configuration(_)));
    }
}
