//! `JustWeather` - weather data access layer
//!
//! This library fetches current conditions, hourly forecasts and
//! precipitation probabilities from a remote weather service, keeps a list
//! of saved locations, and streams weather for all of them at once.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod store;
pub mod weather;

// Re-export core types for public API
pub use config::JustWeatherConfig;
pub use error::WeatherError;
pub use models::{
    BriefWeather, BriefWeatherDetails, CurrentWeatherDetails, DateRange, HourlyForecast, Location,
    PrecipitationProbability, SingleWeatherDetail, WeatherCondition,
};
pub use repository::{BriefWeatherStream, DefaultWeatherRepository, WeatherRepository};
pub use store::{FjallLocationStore, LocationStore, MemoryLocationStore};
pub use weather::{WeatherClient, WeatherPayload, WeatherQuery};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
