//! Remote weather service seam
//!
//! [`WeatherClient`] performs exactly one remote call per query and returns
//! client-neutral readings. The repository turns those readings into domain
//! models; see [`open_meteo::OpenMeteoClient`] for the HTTP implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sunrise::{SolarDay, SolarEvent};

use crate::Result;
use crate::models::{Coordinates, DateRange};

pub mod open_meteo;

/// What to ask the remote service for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherQuery {
    /// Present conditions
    Current,
    /// Hourly readings for every hour of the inclusive range
    Hourly(DateRange),
    /// Daily aggregates plus present conditions, scoped to today
    CurrentDay,
}

/// Present conditions as reported by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentReading {
    pub observed_at: DateTime<Utc>,
    pub temperature: f32,
    pub apparent_temperature: Option<f32>,
    pub relative_humidity: Option<u8>,
    pub wind_speed: Option<f32>,
    pub pressure: Option<f32>,
    pub weather_code: u8,
    pub is_day: bool,
}

/// One hour of forecast data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyReading {
    pub time: NaiveDateTime,
    pub temperature: Option<f32>,
    pub precipitation_probability: Option<u8>,
    pub weather_code: Option<u8>,
    pub is_day: Option<bool>,
}

/// Aggregates for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReading {
    pub date: NaiveDate,
    pub temperature_max: Option<f32>,
    pub temperature_min: Option<f32>,
    pub uv_index_max: Option<f32>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

/// Result of one remote call. Sections the query did not ask for are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherPayload {
    pub current: Option<CurrentReading>,
    pub hourly: Vec<HourlyReading>,
    pub daily: Vec<DailyReading>,
}

/// A remote weather service. Must be safe to call concurrently.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    async fn fetch(&self, coordinates: Coordinates, query: WeatherQuery) -> Result<WeatherPayload>;
}

/// Compute sunrise and sunset in UTC for places where the API omitted them.
///
/// Polar days and nights have no event; the fallback is 06:00 and 19:00.
#[must_use]
pub fn get_sunrise_sunset(coordinates: Coordinates, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let fallback = |hour: u32| {
        date.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN))
            .and_utc()
    };

    let Some(solar_coordinates) =
        sunrise::Coordinates::new(coordinates.latitude, coordinates.longitude)
    else {
        return (fallback(6), fallback(19));
    };

    let solar_day = SolarDay::new(solar_coordinates, date);
    let sunrise = solar_day
        .event_time(SolarEvent::Sunrise)
        .unwrap_or_else(|| fallback(6));
    let sunset = solar_day
        .event_time(SolarEvent::Sunset)
        .unwrap_or_else(|| fallback(19));

    (sunrise, sunset)
}
