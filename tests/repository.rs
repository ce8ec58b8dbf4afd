//! One-shot repository operations against a scripted weather service

mod common;

use chrono::{Days, NaiveDate};
use common::{Behaviour, ScriptedClient, location};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use justweather::config::{StreamConfig, TemperatureUnit};
use justweather::models::DetailKind;
use justweather::{
    BriefWeatherDetails, DateRange, DefaultWeatherRepository, MemoryLocationStore, WeatherError,
    WeatherQuery, WeatherRepository,
};

fn repository(client: &Arc<ScriptedClient>) -> DefaultWeatherRepository {
    DefaultWeatherRepository::new(
        client.clone(),
        Arc::new(MemoryLocationStore::new()),
        StreamConfig::default(),
    )
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_fetch_weather_for_location() {
    let client = ScriptedClient::new();
    let repository = repository(&client);

    let details = repository
        .fetch_weather_for_location("Bern", "46.948", "7.4474")
        .await
        .unwrap();

    assert_eq!(details.location.name, "Bern");
    assert_eq!(details.temperature_rounded, 47);
    assert_eq!(details.feels_like_rounded, 45);
    assert_eq!(client.queries(), vec![WeatherQuery::Current]);
}

#[tokio::test]
async fn test_fetch_weather_failure_is_returned() {
    let client = ScriptedClient::new();
    client.script(&location("Bern", "46.948", "7.4474"), Behaviour::Fail);
    let repository = repository(&client);

    let result = repository
        .fetch_weather_for_location("Bern", "46.948", "7.4474")
        .await;
    assert!(matches!(result, Err(WeatherError::Network { .. })));
}

#[tokio::test]
async fn test_invalid_coordinates_make_no_remote_call() {
    let client = ScriptedClient::new();
    let repository = repository(&client);

    let result = repository
        .fetch_weather_for_location("Nowhere", "north", "7.4474")
        .await;
    assert!(matches!(result, Err(WeatherError::Validation { .. })));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_precipitation_defaults_to_today_and_tomorrow() {
    let client = ScriptedClient::new();
    let repository = repository(&client);

    let probabilities = repository
        .fetch_hourly_precipitation_probabilities("46.948", "7.4474", None)
        .await
        .unwrap();

    let expected = DateRange::today_and_tomorrow();
    assert_eq!(client.queries(), vec![WeatherQuery::Hourly(expected)]);
    // two readings per day in the fake
    assert_eq!(probabilities.len(), 4);
    assert!(probabilities.iter().all(|p| (p.probability - 0.3).abs() < 1e-6));
    assert_eq!(probabilities[0].latitude, "46.948");
}

#[tokio::test]
async fn test_inverted_range_fails_without_remote_call() {
    let client = ScriptedClient::new();
    let repository = repository(&client);
    let inverted = DateRange::new(date("2026-10-16"), date("2026-10-15"));

    let precipitation = repository
        .fetch_hourly_precipitation_probabilities("46.948", "7.4474", Some(inverted))
        .await;
    assert!(matches!(precipitation, Err(WeatherError::Validation { .. })));

    let forecasts = repository
        .fetch_hourly_forecasts("46.948", "7.4474", Some(inverted))
        .await;
    assert!(matches!(forecasts, Err(WeatherError::Validation { .. })));

    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_hourly_forecasts_for_explicit_range() {
    let client = ScriptedClient::new();
    let repository = repository(&client);
    let start = date("2026-10-15");
    let range = DateRange::new(start, start.checked_add_days(Days::new(2)).unwrap());

    let forecasts = repository
        .fetch_hourly_forecasts("46.948", "7.4474", Some(range))
        .await
        .unwrap();

    assert_eq!(forecasts.len(), 6);
    assert_eq!(forecasts[0].date_time.date(), start);
    assert_eq!(forecasts[1].temperature_rounded, 22);
    assert!(forecasts[1].is_day);
    assert!(!forecasts[0].is_day);
}

#[tokio::test]
async fn test_additional_info_items_for_current_day() {
    let client = ScriptedClient::new();
    let repository = repository(&client).with_temperature_unit(TemperatureUnit::Fahrenheit);

    let details = repository
        .fetch_additional_weather_info_items_list_for_current_day("46.948", "7.4474")
        .await
        .unwrap();

    let kinds: Vec<_> = details.iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DetailKind::FeelsLike,
            DetailKind::Humidity,
            DetailKind::WindSpeed,
            DetailKind::Pressure,
            DetailKind::UvIndex,
            DetailKind::Sunrise,
            DetailKind::Sunset,
        ]
    );
    assert_eq!(details[0].value, "45°F");
    assert_eq!(details[5].value, "07:41");
    assert_eq!(client.queries(), vec![WeatherQuery::CurrentDay]);
}

#[tokio::test]
async fn test_save_rejects_blank_name() {
    let client = ScriptedClient::new();
    let repository = repository(&client);

    let result = repository.save_weather_location("  ", "46.948", "7.4474").await;
    assert!(matches!(result, Err(WeatherError::Validation { .. })));
    assert!(repository.saved_locations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_soft_delete_is_recoverable_and_permanent_delete_is_not() {
    let client = ScriptedClient::new();
    let repository = repository(&client);
    let bern = location("Bern", "46.948", "7.4474");

    repository
        .save_weather_location("Bern", "46.948", "7.4474")
        .await
        .unwrap();
    let brief = BriefWeatherDetails::empty(bern.clone());

    repository
        .delete_weather_location_from_saved_items(&brief)
        .await
        .unwrap();
    assert!(repository.saved_locations().await.unwrap().is_empty());
    assert_eq!(repository.deleted_locations().await.unwrap(), vec![bern.clone()]);

    repository
        .restore_weather_location_from_deleted_items(&bern)
        .await
        .unwrap();
    assert_eq!(repository.saved_locations().await.unwrap(), vec![bern.clone()]);

    repository
        .permanently_delete_weather_location_from_saved_items(&brief)
        .await
        .unwrap();
    assert!(repository.saved_locations().await.unwrap().is_empty());
    assert!(repository.deleted_locations().await.unwrap().is_empty());

    let restore = repository
        .restore_weather_location_from_deleted_items(&bern)
        .await;
    assert!(matches!(restore, Err(WeatherError::Persistence { .. })));
}

#[tokio::test]
async fn test_stream_follows_saved_location_changes() {
    let client = ScriptedClient::new();
    let repository = repository(&client);
    client.script(&location("Zurich", "47.3769", "8.5417"), Behaviour::Fail);

    let mut stream = repository.weather_stream_for_saved_locations();
    let initial = timeout(Duration::from_secs(5), stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(initial.is_empty());

    repository
        .save_weather_location("Bern", "46.948", "7.4474")
        .await
        .unwrap();
    let snapshot = timeout(Duration::from_secs(5), stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(!snapshot[0].is_empty());

    repository
        .save_weather_location("Zurich", "47.3769", "8.5417")
        .await
        .unwrap();
    let snapshot = timeout(Duration::from_secs(5), stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.len(), 2);
    assert!(!snapshot[0].is_empty());
    assert!(snapshot[1].is_empty());
    assert_eq!(snapshot[1].location().name, "Zurich");
}
