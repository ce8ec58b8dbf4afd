//! Turn client readings into domain models

use chrono::{Local, NaiveDate, Timelike};

use crate::config::TemperatureUnit;
use crate::models::{
    Coordinates, CurrentWeatherDetails, DateRange, DetailKind, HourlyForecast, Location,
    PrecipitationProbability, SingleWeatherDetail, WeatherCondition,
};
use crate::weather::{self, HourlyReading, WeatherPayload};
use crate::{Result, WeatherError};

fn round(value: f32) -> i32 {
    value.round() as i32
}

fn fallback_is_day(reading: &HourlyReading) -> bool {
    (6..19).contains(&reading.time.hour())
}

pub(crate) fn current_details(
    location: Location,
    payload: WeatherPayload,
) -> Result<CurrentWeatherDetails> {
    let current = payload
        .current
        .ok_or_else(|| WeatherError::invalid_response("Response has no current conditions"))?;

    Ok(CurrentWeatherDetails {
        location,
        temperature_rounded: round(current.temperature),
        feels_like_rounded: round(current.apparent_temperature.unwrap_or(current.temperature)),
        condition: WeatherCondition::from_wmo_code(current.weather_code),
        is_day: current.is_day,
        observed_at: current.observed_at,
    })
}

/// Hours inside `range` that carry a temperature
pub(crate) fn hourly_forecasts(payload: &WeatherPayload, range: DateRange) -> Vec<HourlyForecast> {
    payload
        .hourly
        .iter()
        .filter(|reading| range.contains(reading.time.date()))
        .filter_map(|reading| {
            let temperature = reading.temperature?;
            Some(HourlyForecast {
                date_time: reading.time,
                temperature_rounded: round(temperature),
                condition: reading
                    .weather_code
                    .map_or(WeatherCondition::Unknown, WeatherCondition::from_wmo_code),
                is_day: reading.is_day.unwrap_or_else(|| fallback_is_day(reading)),
            })
        })
        .collect()
}

/// Hours inside `range` that carry a precipitation probability
pub(crate) fn precipitation_probabilities(
    latitude: &str,
    longitude: &str,
    payload: &WeatherPayload,
    range: DateRange,
) -> Vec<PrecipitationProbability> {
    payload
        .hourly
        .iter()
        .filter(|reading| range.contains(reading.time.date()))
        .filter_map(|reading| {
            reading.precipitation_probability.map(|percentage| {
                PrecipitationProbability::from_percentage(
                    latitude.trim(),
                    longitude.trim(),
                    reading.time,
                    percentage,
                )
            })
        })
        .collect()
}

/// Auxiliary metrics for today in display order.
///
/// Metrics the service did not report are left out, except sunrise and
/// sunset which are computed locally when missing.
pub(crate) fn additional_details(
    coordinates: Coordinates,
    payload: &WeatherPayload,
    unit: TemperatureUnit,
) -> Result<Vec<SingleWeatherDetail>> {
    let current = payload
        .current
        .as_ref()
        .ok_or_else(|| WeatherError::invalid_response("Response has no current conditions"))?;
    let today = payload.daily.first();

    let mut details = Vec::with_capacity(7);
    if let Some(feels_like) = current.apparent_temperature {
        details.push(SingleWeatherDetail::new(
            DetailKind::FeelsLike,
            format!("{}{}", round(feels_like), unit.symbol()),
        ));
    }
    if let Some(humidity) = current.relative_humidity {
        details.push(SingleWeatherDetail::new(
            DetailKind::Humidity,
            format!("{humidity}%"),
        ));
    }
    if let Some(wind_speed) = current.wind_speed {
        details.push(SingleWeatherDetail::new(
            DetailKind::WindSpeed,
            format!("{wind_speed:.0} km/h"),
        ));
    }
    if let Some(pressure) = current.pressure {
        details.push(SingleWeatherDetail::new(
            DetailKind::Pressure,
            format!("{pressure:.0} hPa"),
        ));
    }
    if let Some(uv_index) = today.and_then(|day| day.uv_index_max) {
        details.push(SingleWeatherDetail::new(
            DetailKind::UvIndex,
            round(uv_index).to_string(),
        ));
    }

    let date = today.map_or_else(|| Local::now().date_naive(), |day| day.date);
    let (sunrise, sunset) = sun_times(coordinates, payload, date);
    details.push(SingleWeatherDetail::new(DetailKind::Sunrise, sunrise));
    details.push(SingleWeatherDetail::new(DetailKind::Sunset, sunset));

    Ok(details)
}

/// Local sunrise and sunset from the service, or computed UTC times
fn sun_times(coordinates: Coordinates, payload: &WeatherPayload, date: NaiveDate) -> (String, String) {
    let today = payload.daily.first();
    let reported_sunrise = today.and_then(|day| day.sunrise);
    let reported_sunset = today.and_then(|day| day.sunset);

    if let (Some(sunrise), Some(sunset)) = (reported_sunrise, reported_sunset) {
        return (
            sunrise.format("%H:%M").to_string(),
            sunset.format("%H:%M").to_string(),
        );
    }

    tracing::debug!("Sun times missing from response, computing for {}", date);
    let (sunrise, sunset) = weather::get_sunrise_sunset(coordinates, date);
    let sunrise = reported_sunrise.map_or_else(
        || sunrise.format("%H:%M UTC").to_string(),
        |time| time.format("%H:%M").to_string(),
    );
    let sunset = reported_sunset.map_or_else(
        || sunset.format("%H:%M UTC").to_string(),
        |time| time.format("%H:%M").to_string(),
    );
    (sunrise, sunset)
}
