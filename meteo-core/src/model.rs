use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::i18n::Language;

/// A single lookup as issued by the dashboard.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    /// City name as typed by the user (or taken from the history list).
    pub city: String,
    /// Language the remote API should localize descriptions in.
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Broad condition category reported by OpenWeatherMap in `weather[0].main`.
///
/// The "atmosphere" group collapses the obscuration codes (Mist, Smoke, Haze,
/// Dust, Fog, Sand, Ash, Squall, Tornado) into one bucket; anything
/// unrecognized is treated as clear sky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Atmosphere,
}

impl Condition {
    pub fn from_api_main(main: &str) -> Self {
        match main {
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Drizzle" => Self::Drizzle,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" | "Squall" | "Tornado" => {
                Self::Atmosphere
            }
            _ => Self::Clear,
        }
    }

    /// Glyph shown next to the temperature in the weather panel.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::Clouds => "☁",
            Self::Rain => "🌧",
            Self::Drizzle => "🌦",
            Self::Thunderstorm => "⛈",
            Self::Snow => "❄",
            Self::Atmosphere => "🌫",
        }
    }
}

/// Current conditions for one city, already rounded for display.
///
/// Valid only until the next search; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Canonical city name as reported by the API (this is what the search
    /// history records, not the user's spelling).
    pub city: String,
    /// Localized condition description, e.g. "ciel dégagé".
    pub description: String,
    pub condition: Condition,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub humidity_pct: u8,
    pub wind_kmh: i32,
    pub pressure_hpa: u32,
    /// Cloudiness in percent, drives the map's cloud overlay.
    pub cloud_cover_pct: u8,
    pub coord: Coordinates,
    pub observed_at: DateTime<Utc>,
}
