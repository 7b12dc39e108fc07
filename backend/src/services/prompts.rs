//! Prompt templates sent to the generative models

use shared::{LandCoverageRecord, LocationContext, SeasonContext, WeatherSnapshot};

/// Asks the vision model for a fenced coverage JSON block
pub const COVERAGE_PROMPT: &str = r#"From this image, estimate the land coverage percentages and return the result in valid JSON format inside a ```json code block. The JSON must match the following schema:
{
  "plant_coverage": float,
  "building_coverage": float,
  "road_coverage": float,
  "empty_land": float,
  "water_body": float
}
plant_coverage, building_coverage, road_coverage and empty_land must add up to 100. water_body is reported separately.
Only return the JSON block. Do not include any explanation or extra text. All values should be in percentage format as floats (e.g., 23.5)."#;

/// Build the recommendation prompt for one location
pub fn recommendation_prompt(
    location: &LocationContext,
    weather: &WeatherSnapshot,
    coverage: &LandCoverageRecord,
    season: &SeasonContext,
) -> String {
    format!(
        "You are an expert botanist and landscape designer. Based on the following environmental \
conditions and the current season, recommend 3-5 suitable plants that can thrive in this location.

Location: {city}, {country} ({latitude}, {longitude})

Weather Conditions:
- Temperature: {temperature}°C (Feels like: {feels_like}°C)
- Humidity: {humidity}%
- Weather: {description}
- Wind Speed: {wind_speed:.1} m/s
- Precipitation: {precipitation} mm
- UV Index: {uv_index}
- Visibility: {visibility} km

Land Coverage:
- Plant Coverage: {vegetation}%
- Building Coverage: {building}%
- Road Coverage: {road}%
- Empty Land Available: {empty_land}%
- Water Bodies: {water_body}%

Season: {season}
Planting Guidelines: {guidance}

Please provide recommendations in the following format for each plant:

Plant: [Plant Name]
Reason: [Why this plant is suitable for these conditions]
Care: [Basic care instructions]
",
        city = location.city,
        country = location.country,
        latitude = location.latitude,
        longitude = location.longitude,
        temperature = weather.temperature,
        feels_like = weather.feels_like,
        humidity = weather.humidity,
        description = weather.weather_description,
        wind_speed = weather.wind_speed,
        precipitation = weather.precipitation,
        uv_index = weather.uv_index,
        visibility = weather.visibility,
        vegetation = coverage.vegetation(),
        building = coverage.building(),
        road = coverage.road(),
        empty_land = coverage.empty_land(),
        water_body = coverage.water_body(),
        season = season.season,
        guidance = season.planting_season,
    )
}
