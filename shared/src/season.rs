//! Season resolution from local time, latitude and country
//!
//! Resolution never fails: a timestamp that cannot be parsed yields an
//! `Unknown` season dated on the fallback day.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Utc};

use crate::models::{Season, SeasonContext};

/// Timestamp layout used by the weather provider's `localtime`
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Countries whose June to September monsoon overrides hemisphere seasons
const MONSOON_COUNTRIES: [&str; 5] = ["india", "bangladesh", "sri lanka", "nepal", "pakistan"];
const MONSOON_MONTHS: [u32; 4] = [6, 7, 8, 9];

const RAINY_GUIDANCE: &str =
    "Excellent for rice, sugarcane, tropical fruits, and water-loving plants";
const DEFAULT_GUIDANCE: &str = "Season-appropriate planting recommended";

/// Resolve the season for a local timestamp, falling back to today (UTC)
pub fn resolve_season(
    local_timestamp: &str,
    timezone: &str,
    latitude: f64,
    country: &str,
) -> SeasonContext {
    resolve_season_on(
        local_timestamp,
        timezone,
        latitude,
        country,
        Utc::now().date_naive(),
    )
}

/// Same as [`resolve_season`] with an explicit fallback date
pub fn resolve_season_on(
    local_timestamp: &str,
    timezone: &str,
    latitude: f64,
    country: &str,
    fallback_date: NaiveDate,
) -> SeasonContext {
    let local_time = match NaiveDateTime::parse_from_str(local_timestamp.trim(), LOCAL_TIME_FORMAT)
    {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(
                "Could not parse local time {:?} ({}): {}",
                local_timestamp,
                timezone,
                e
            );
            return SeasonContext {
                season: Season::Unknown,
                month: fallback_date.month(),
                day_of_year: fallback_date.ordinal(),
                is_growing_season: true,
                planting_season: DEFAULT_GUIDANCE.to_string(),
            };
        }
    };

    let month = local_time.month();
    let season = if is_monsoon(country, month) {
        Season::Rainy
    } else {
        hemisphere_season(month, latitude < 0.0)
    };

    SeasonContext {
        season,
        month,
        day_of_year: local_time.ordinal(),
        is_growing_season: season.is_growing(),
        planting_season: planting_guidance(season).to_string(),
    }
}

fn is_monsoon(country: &str, month: u32) -> bool {
    let country = country.trim().to_lowercase();
    MONSOON_COUNTRIES.contains(&country.as_str()) && MONSOON_MONTHS.contains(&month)
}

/// Meteorological season by month triple, flipped south of the equator
pub fn hemisphere_season(month: u32, southern: bool) -> Season {
    match (month, southern) {
        (12 | 1 | 2, false) => Season::Winter,
        (3..=5, false) => Season::Spring,
        (6..=8, false) => Season::Summer,
        (_, false) => Season::Autumn,
        (12 | 1 | 2, true) => Season::Summer,
        (3..=5, true) => Season::Autumn,
        (6..=8, true) => Season::Winter,
        (_, true) => Season::Spring,
    }
}

/// Fixed planting note for a season
pub fn planting_guidance(season: Season) -> &'static str {
    match season {
        Season::Rainy => RAINY_GUIDANCE,
        Season::Spring => "Prime planting time for most plants",
        Season::Summer => "Good for heat-tolerant plants, ensure adequate watering",
        Season::Autumn => "Good for trees and shrubs, prepare for dormancy",
        Season::Winter => "Indoor planting or dormant season preparations",
        Season::Unknown => DEFAULT_GUIDANCE,
    }
}
