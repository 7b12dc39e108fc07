//! Season models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Calendar/climate season used to tailor planting guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
    Rainy,
    Unknown,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Rainy => "Rainy",
            Season::Unknown => "Unknown",
        }
    }

    /// Spring, Summer and the monsoon count as growing seasons
    pub fn is_growing(&self) -> bool {
        matches!(self, Season::Spring | Season::Summer | Season::Rainy)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Season context derived for a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonContext {
    pub season: Season,
    pub month: u32,
    pub day_of_year: u32,
    pub is_growing_season: bool,
    pub planting_season: String,
}
