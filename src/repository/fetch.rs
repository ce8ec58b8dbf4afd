//! Per-location fetch task

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::convert;
use crate::models::{BriefWeatherDetails, CurrentWeatherDetails, Location};
use crate::weather::{WeatherClient, WeatherQuery};
use crate::{Result, WeatherError};

/// One remote call for the present conditions at `location`
pub(crate) async fn current_weather(
    client: &dyn WeatherClient,
    location: Location,
) -> Result<CurrentWeatherDetails> {
    let coordinates = location.coordinates()?;
    let payload = client.fetch(coordinates, WeatherQuery::Current).await?;
    convert::current_details(location, payload)
}

/// Fetch a brief summary for one saved location.
///
/// Never fails: any error, including running past `timeout`, yields the
/// `Empty` entry for that location.
pub(crate) async fn brief_weather(
    client: Arc<dyn WeatherClient>,
    location: Location,
    timeout: Option<Duration>,
) -> BriefWeatherDetails {
    let request = current_weather(client.as_ref(), location.clone());
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or_else(|_| {
                Err(WeatherError::network(format!(
                    "No response within {}s",
                    limit.as_secs()
                )))
            }),
        None => request.await,
    };

    match result {
        Ok(details) => {
            debug!("Fetched brief weather for {}", location.name);
            details.into()
        }
        Err(e) if e.is_remote() => {
            warn!(
                "Weather for {} ({}) unavailable: {}",
                location.name,
                location.format_coordinates(),
                e
            );
            BriefWeatherDetails::empty(location)
        }
        Err(e) => {
            error!(
                "Saved location {} ({}) cannot be fetched: {}",
                location.name,
                location.format_coordinates(),
                e
            );
            BriefWeatherDetails::empty(location)
        }
    }
}
