use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

use super::stream::{BriefWeatherStream, saved_locations_weather};
use super::{WeatherRepository, convert, fetch};
use crate::Result;
use crate::config::{JustWeatherConfig, StreamConfig, TemperatureUnit};
use crate::models::{
    BriefWeatherDetails, Coordinates, CurrentWeatherDetails, DateRange, HourlyForecast, Location,
    PrecipitationProbability, SingleWeatherDetail,
};
use crate::store::{FjallLocationStore, LocationStore};
use crate::weather::open_meteo::OpenMeteoClient;
use crate::weather::{WeatherClient, WeatherPayload, WeatherQuery};

/// [`WeatherRepository`] backed by a remote [`WeatherClient`] and a
/// [`LocationStore`]
pub struct DefaultWeatherRepository {
    client: Arc<dyn WeatherClient>,
    store: Arc<dyn LocationStore>,
    stream_config: StreamConfig,
    temperature_unit: TemperatureUnit,
}

impl DefaultWeatherRepository {
    /// Create a new repository from its collaborators
    #[must_use]
    pub fn new(
        client: Arc<dyn WeatherClient>,
        store: Arc<dyn LocationStore>,
        stream_config: StreamConfig,
    ) -> Self {
        Self {
            client,
            store,
            stream_config,
            temperature_unit: TemperatureUnit::default(),
        }
    }

    /// Unit used when formatting temperatures in detail items
    #[must_use]
    pub fn with_temperature_unit(mut self, temperature_unit: TemperatureUnit) -> Self {
        self.temperature_unit = temperature_unit;
        self
    }

    /// Wire up the Open-Meteo client and the on-disk store from configuration
    pub fn from_config(config: &JustWeatherConfig) -> Result<Self> {
        let client = OpenMeteoClient::new(&config.weather)?;
        let store = FjallLocationStore::open(config.store_path())?;
        Ok(
            Self::new(Arc::new(client), Arc::new(store), config.stream.clone())
                .with_temperature_unit(config.weather.temperature_unit),
        )
    }

    async fn fetch_hourly(
        &self,
        latitude: &str,
        longitude: &str,
        date_range: Option<DateRange>,
    ) -> Result<(DateRange, WeatherPayload)> {
        let range = date_range.unwrap_or_default();
        range.validate()?;
        let coordinates = Coordinates::parse(latitude, longitude)?;
        let payload = self
            .client
            .fetch(coordinates, WeatherQuery::Hourly(range))
            .await?;
        Ok((range, payload))
    }
}

#[async_trait]
impl WeatherRepository for DefaultWeatherRepository {
    #[instrument(skip(self))]
    async fn fetch_weather_for_location(
        &self,
        name_of_location: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<CurrentWeatherDetails> {
        let start_time = Instant::now();
        let location = Location::new(name_of_location, latitude, longitude);
        let details = fetch::current_weather(self.client.as_ref(), location).await?;
        info!(
            "Fetched current weather for {} in {:.3}s",
            name_of_location,
            start_time.elapsed().as_secs_f64()
        );
        Ok(details)
    }

    fn weather_stream_for_saved_locations(&self) -> BriefWeatherStream {
        saved_locations_weather(
            Arc::clone(&self.client),
            self.store.observe_saved_locations(),
            self.stream_config.clone(),
        )
    }

    #[instrument(skip(self))]
    async fn save_weather_location(
        &self,
        name_of_location: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<()> {
        let location = Location::new(name_of_location.trim(), latitude.trim(), longitude.trim());
        location.validate()?;
        self.store.save(location).await?;
        info!("Saved location {}", name_of_location);
        Ok(())
    }

    async fn delete_weather_location_from_saved_items(
        &self,
        brief_weather_location: &BriefWeatherDetails,
    ) -> Result<()> {
        let location = brief_weather_location.location();
        self.store.soft_delete(location).await?;
        info!("Deleted location {}", location.name);
        Ok(())
    }

    async fn permanently_delete_weather_location_from_saved_items(
        &self,
        brief_weather_location: &BriefWeatherDetails,
    ) -> Result<()> {
        let location = brief_weather_location.location();
        self.store.permanent_delete(location).await?;
        info!("Permanently deleted location {}", location.name);
        Ok(())
    }

    async fn restore_weather_location_from_deleted_items(
        &self,
        location: &Location,
    ) -> Result<()> {
        self.store.restore(location).await?;
        info!("Restored location {}", location.name);
        Ok(())
    }

    async fn saved_locations(&self) -> Result<Vec<Location>> {
        self.store.saved_locations().await
    }

    async fn deleted_locations(&self) -> Result<Vec<Location>> {
        self.store.deleted_locations().await
    }

    #[instrument(skip(self))]
    async fn fetch_hourly_precipitation_probabilities(
        &self,
        latitude: &str,
        longitude: &str,
        date_range: Option<DateRange>,
    ) -> Result<Vec<PrecipitationProbability>> {
        let (range, payload) = self.fetch_hourly(latitude, longitude, date_range).await?;
        Ok(convert::precipitation_probabilities(
            latitude, longitude, &payload, range,
        ))
    }

    #[instrument(skip(self))]
    async fn fetch_hourly_forecasts(
        &self,
        latitude: &str,
        longitude: &str,
        date_range: Option<DateRange>,
    ) -> Result<Vec<HourlyForecast>> {
        let (range, payload) = self.fetch_hourly(latitude, longitude, date_range).await?;
        Ok(convert::hourly_forecasts(&payload, range))
    }

    #[instrument(skip(self))]
    async fn fetch_additional_weather_info_items_list_for_current_day(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<Vec<SingleWeatherDetail>> {
        let coordinates = Coordinates::parse(latitude, longitude)?;
        let payload = self
            .client
            .fetch(coordinates, WeatherQuery::CurrentDay)
            .await?;
        convert::additional_details(coordinates, &payload, self.temperature_unit)
    }
}
