//! Data models for the JustWeather data layer
//!
//! This module contains the domain models organized by concern:
//! - Location: saved places and coordinate parsing
//! - Weather: current conditions, brief summaries and detail items
//! - Forecast: hourly forecasts, precipitation and date ranges

pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{DateRange, HourlyForecast, PrecipitationProbability};
pub use location::{Coordinates, Location};
pub use weather::{
    BriefWeather, BriefWeatherDetails, CurrentWeatherDetails, DetailKind, SingleWeatherDetail,
    WeatherCondition,
};
