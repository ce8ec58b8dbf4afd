//! Weather data access layer
//!
//! [`WeatherRepository`] is the single entry point the rest of the
//! application uses for weather data and saved locations. One-shot
//! operations return an explicit `Result`; the saved-locations stream keeps
//! going when individual locations fail.

use async_trait::async_trait;

use crate::Result;
use crate::models::{
    BriefWeatherDetails, CurrentWeatherDetails, DateRange, HourlyForecast, Location,
    PrecipitationProbability, SingleWeatherDetail,
};

mod convert;
mod default_repository;
mod fetch;
pub mod stream;

pub use default_repository::DefaultWeatherRepository;
pub use stream::{BriefWeatherStream, saved_locations_weather};

#[async_trait]
pub trait WeatherRepository: Send + Sync {
    /// Present conditions for the given place. One remote call.
    async fn fetch_weather_for_location(
        &self,
        name_of_location: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<CurrentWeatherDetails>;

    /// Live brief weather for every saved location.
    ///
    /// A location whose fetch fails appears as
    /// [`BriefWeatherDetails::Empty`]; the other entries are unaffected.
    fn weather_stream_for_saved_locations(&self) -> BriefWeatherStream;

    /// Save a location, replacing any saved location at the same coordinates
    async fn save_weather_location(
        &self,
        name_of_location: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<()>;

    /// Remove a location from the saved items. Can be undone with
    /// [`restore_weather_location_from_deleted_items`](Self::restore_weather_location_from_deleted_items);
    /// see [`permanently_delete_weather_location_from_saved_items`](Self::permanently_delete_weather_location_from_saved_items)
    /// for a removal that cannot.
    async fn delete_weather_location_from_saved_items(
        &self,
        brief_weather_location: &BriefWeatherDetails,
    ) -> Result<()>;

    /// Remove a location from the saved items for good
    async fn permanently_delete_weather_location_from_saved_items(
        &self,
        brief_weather_location: &BriefWeatherDetails,
    ) -> Result<()>;

    /// Undo a previous delete
    async fn restore_weather_location_from_deleted_items(&self, location: &Location)
    -> Result<()>;

    /// Saved locations in the order they were added
    async fn saved_locations(&self) -> Result<Vec<Location>>;

    /// Deleted locations that can still be restored
    async fn deleted_locations(&self) -> Result<Vec<Location>>;

    /// Hourly precipitation probabilities. `None` means today and tomorrow.
    ///
    /// Fails with a validation error, without any remote call, when the
    /// range starts after it ends.
    async fn fetch_hourly_precipitation_probabilities(
        &self,
        latitude: &str,
        longitude: &str,
        date_range: Option<DateRange>,
    ) -> Result<Vec<PrecipitationProbability>>;

    /// Hourly forecasts. `None` means today and tomorrow.
    async fn fetch_hourly_forecasts(
        &self,
        latitude: &str,
        longitude: &str,
        date_range: Option<DateRange>,
    ) -> Result<Vec<HourlyForecast>>;

    /// Auxiliary metrics for today (feels like, humidity, sunrise, ...)
    async fn fetch_additional_weather_info_items_list_for_current_day(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<Vec<SingleWeatherDetail>>;
}
