//! Weather data models

use serde::{Deserialize, Serialize};

/// Current conditions at a named location, as supplied by the weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    /// Metres per second
    pub wind_speed: f64,
    pub precipitation: f64,
    pub uv_index: f64,
    pub visibility: f64,
    pub weather_description: String,
    /// Provider local time, `%Y-%m-%d %H:%M`
    pub local_time: String,
    /// IANA timezone identifier
    pub timezone: String,
}

/// Convert a wind speed in km/h to m/s
pub fn kph_to_mps(kph: f64) -> f64 {
    kph / 3.6
}
