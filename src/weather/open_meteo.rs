//! Open-Meteo forecast API client
//!
//! One HTTP GET per [`WeatherQuery`]. Transient transport failures are retried
//! by the middleware stack; everything else surfaces as a [`WeatherError`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{
    CurrentReading, DailyReading, HourlyReading, WeatherClient, WeatherPayload, WeatherQuery,
};
use crate::config::{TemperatureUnit, WeatherConfig};
use crate::models::Coordinates;
use crate::{Result, WeatherError};

const USER_AGENT: &str = concat!("JustWeather/", env!("CARGO_PKG_VERSION"));
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,is_day,weather_code,wind_speed_10m,surface_pressure";
const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,weather_code,is_day";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,uv_index_max,sunrise,sunset";

/// Weather client backed by the Open-Meteo forecast endpoint
#[derive(Clone)]
pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    base_url: String,
    temperature_unit: TemperatureUnit,
}

impl OpenMeteoClient {
    /// Create a new client from the weather section of the configuration
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature_unit: config.temperature_unit,
        })
    }

    fn build_url(&self, coordinates: Coordinates, query: WeatherQuery) -> String {
        let mut url = format!(
            "{}/forecast?latitude={}&longitude={}&timezone=auto&temperature_unit={}&wind_speed_unit=kmh",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            self.temperature_unit.as_query()
        );

        match query {
            WeatherQuery::Current => {
                url.push_str(&format!("&current={CURRENT_FIELDS}"));
            }
            WeatherQuery::Hourly(range) => {
                url.push_str(&format!(
                    "&hourly={HOURLY_FIELDS}&start_date={}&end_date={}",
                    range.start.format("%Y-%m-%d"),
                    range.end.format("%Y-%m-%d")
                ));
            }
            WeatherQuery::CurrentDay => {
                url.push_str(&format!(
                    "&current={CURRENT_FIELDS}&daily={DAILY_FIELDS}&forecast_days=1"
                ));
            }
        }

        url
    }
}

#[async_trait]
impl WeatherClient for OpenMeteoClient {
    #[instrument(name = "open_meteo_fetch", skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn fetch(&self, coordinates: Coordinates, query: WeatherQuery) -> Result<WeatherPayload> {
        let url = self.build_url(coordinates, query);
        debug!("OpenMeteo API request URL: {}", url);
        let start_time = Instant::now();

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::network(format!(
                "OpenMeteo request failed with status: {status}"
            )));
        }

        let forecast: ForecastResponse = response.json().await?;
        let payload = forecast.into_payload()?;
        ensure_sections(&payload, query)?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {:?} in {:.3}s ({} hourly, {} daily)",
            query,
            total_duration.as_secs_f64(),
            payload.hourly.len(),
            payload.daily.len()
        );
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow OpenMeteo response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(payload)
    }
}

/// The sections each query depends on must be present
fn ensure_sections(payload: &WeatherPayload, query: WeatherQuery) -> Result<()> {
    let missing = match query {
        WeatherQuery::Current => payload.current.is_none().then_some("current"),
        WeatherQuery::Hourly(_) => None,
        WeatherQuery::CurrentDay => {
            if payload.daily.is_empty() {
                Some("daily")
            } else {
                payload.current.is_none().then_some("current")
            }
        }
    };

    match missing {
        Some(section) => Err(WeatherError::invalid_response(format!(
            "OpenMeteo response has no {section} data"
        ))),
        None => Ok(()),
    }
}

/// Forecast response from the `OpenMeteo` API
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    pub current: Option<CurrentData>,
    pub hourly: Option<HourlyData>,
    pub daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentData {
    pub time: String,
    #[serde(rename = "temperature_2m")]
    pub temperature: f32,
    pub apparent_temperature: Option<f32>,
    #[serde(rename = "relative_humidity_2m")]
    pub relative_humidity: Option<u8>,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: Option<f32>,
    #[serde(rename = "surface_pressure")]
    pub pressure: Option<f32>,
    pub weather_code: u8,
    pub is_day: u8,
}

#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: Option<Vec<Option<f32>>>,
    pub precipitation_probability: Option<Vec<Option<u8>>>,
    pub weather_code: Option<Vec<Option<u8>>>,
    pub is_day: Option<Vec<Option<u8>>>,
}

#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Option<Vec<Option<f32>>>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Option<Vec<Option<f32>>>,
    pub uv_index_max: Option<Vec<Option<f32>>>,
    pub sunrise: Option<Vec<Option<String>>>,
    pub sunset: Option<Vec<Option<String>>>,
}

/// Value at `i` of an optional column, `None` when the column or cell is missing
fn cell<T: Clone>(column: &Option<Vec<Option<T>>>, i: usize) -> Option<T> {
    column.as_ref().and_then(|values| values.get(i)).cloned().flatten()
}

fn parse_local_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| WeatherError::invalid_response(format!("Invalid timestamp '{value}': {e}")))
}

impl ForecastResponse {
    /// Convert the wire structures into client-neutral readings
    pub fn into_payload(self) -> Result<WeatherPayload> {
        let utc_offset = chrono::Duration::seconds(i64::from(self.utc_offset_seconds));

        let current = self
            .current
            .map(|current| -> Result<CurrentReading> {
                let local = parse_local_time(&current.time)?;
                let observed_at: DateTime<Utc> = (local - utc_offset).and_utc();
                Ok(CurrentReading {
                    observed_at,
                    temperature: current.temperature,
                    apparent_temperature: current.apparent_temperature,
                    relative_humidity: current.relative_humidity,
                    wind_speed: current.wind_speed,
                    pressure: current.pressure,
                    weather_code: current.weather_code,
                    is_day: current.is_day != 0,
                })
            })
            .transpose()?;

        let hourly = match self.hourly {
            Some(hourly) => hourly
                .time
                .iter()
                .enumerate()
                .map(|(i, time)| {
                    Ok(HourlyReading {
                        time: parse_local_time(time)?,
                        temperature: cell(&hourly.temperature, i),
                        precipitation_probability: cell(&hourly.precipitation_probability, i),
                        weather_code: cell(&hourly.weather_code, i),
                        is_day: cell(&hourly.is_day, i).map(|flag| flag != 0),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let daily = match self.daily {
            Some(daily) => daily
                .time
                .iter()
                .enumerate()
                .map(|(i, day)| {
                    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
                        WeatherError::invalid_response(format!("Invalid date '{day}': {e}"))
                    })?;
                    Ok(DailyReading {
                        date,
                        temperature_max: cell(&daily.temperature_max, i),
                        temperature_min: cell(&daily.temperature_min, i),
                        uv_index_max: cell(&daily.uv_index_max, i),
                        sunrise: cell(&daily.sunrise, i)
                            .and_then(|value| parse_local_time(&value).ok()),
                        sunset: cell(&daily.sunset, i)
                            .and_then(|value| parse_local_time(&value).ok()),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(WeatherPayload {
            current,
            hourly,
            daily,
        })
    }
}
