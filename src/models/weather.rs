//! Current conditions, brief summaries and auxiliary detail items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    ClearSky,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    Drizzle,
    FreezingDrizzle,
    Rain,
    FreezingRain,
    Snow,
    RainShowers,
    SnowShowers,
    Thunderstorm,
    Unknown,
}

impl WeatherCondition {
    /// Convert a WMO weather code to a condition.
    /// See <https://open-meteo.com/en/docs#weathervariables>
    #[must_use]
    pub fn from_wmo_code(code: u8) -> Self {
        match code {
            0 => Self::ClearSky,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::FreezingDrizzle,
            61 | 63 | 65 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 | 77 => Self::Snow,
            80..=82 => Self::RainShowers,
            85 | 86 => Self::SnowShowers,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::ClearSky => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::FreezingDrizzle => "Freezing drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing rain",
            Self::Snow => "Snow",
            Self::RainShowers => "Rain showers",
            Self::SnowShowers => "Snow showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }
}

/// Present conditions for one location at fetch time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeatherDetails {
    pub location: Location,
    /// Temperature in the configured unit, rounded
    pub temperature_rounded: i32,
    /// Apparent temperature in the configured unit, rounded
    pub feels_like_rounded: i32,
    pub condition: WeatherCondition,
    pub is_day: bool,
    /// When the remote service observed these conditions
    pub observed_at: DateTime<Utc>,
}

/// Populated half of [`BriefWeatherDetails`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefWeather {
    pub location: Location,
    pub short_description: String,
    pub condition: WeatherCondition,
    pub is_day: bool,
    pub current_temperature_rounded: i32,
}

/// Condensed per-location summary used in the saved-locations stream.
///
/// `Empty` marks a location whose fetch failed. It keeps the location so the
/// entry can still be identified and deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BriefWeatherDetails {
    Populated(BriefWeather),
    Empty { location: Location },
}

impl BriefWeatherDetails {
    #[must_use]
    pub fn empty(location: Location) -> Self {
        Self::Empty { location }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::Populated(brief) => &brief.location,
            Self::Empty { location } => location,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    #[must_use]
    pub fn as_populated(&self) -> Option<&BriefWeather> {
        match self {
            Self::Populated(brief) => Some(brief),
            Self::Empty { .. } => None,
        }
    }
}

impl From<CurrentWeatherDetails> for BriefWeatherDetails {
    fn from(details: CurrentWeatherDetails) -> Self {
        Self::Populated(BriefWeather {
            short_description: details.condition.description().to_string(),
            condition: details.condition,
            is_day: details.is_day,
            current_temperature_rounded: details.temperature_rounded,
            location: details.location,
        })
    }
}

/// Which auxiliary metric a [`SingleWeatherDetail`] carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    FeelsLike,
    Humidity,
    WindSpeed,
    Pressure,
    UvIndex,
    Sunrise,
    Sunset,
}

impl DetailKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::FeelsLike => "Feels like",
            Self::Humidity => "Humidity",
            Self::WindSpeed => "Wind speed",
            Self::Pressure => "Pressure",
            Self::UvIndex => "UV index",
            Self::Sunrise => "Sunrise",
            Self::Sunset => "Sunset",
        }
    }
}

/// One named auxiliary metric for the current day, already formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleWeatherDetail {
    pub kind: DetailKind,
    pub name: String,
    pub value: String,
}

impl SingleWeatherDetail {
    #[must_use]
    pub fn new(kind: DetailKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            name: kind.label().to_string(),
            value: value.into(),
        }
    }
}
