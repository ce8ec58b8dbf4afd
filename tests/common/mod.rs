//! Shared fakes for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime, Utc};
use futures::StreamExt;
use futures::channel::mpsc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Barrier, Notify};

use justweather::models::Coordinates;
use justweather::store::LocationStream;
use justweather::weather::{CurrentReading, DailyReading, HourlyReading};
use justweather::{Location, Result, WeatherClient, WeatherError, WeatherPayload, WeatherQuery};

/// How the fake answers for one location
#[derive(Clone)]
pub enum Behaviour {
    Succeed,
    Fail,
    /// Never answers
    Stall,
    /// Never answers the first call, succeeds afterwards
    StallFirstCall,
    /// Answers after a delay
    Delay(Duration),
    /// Waits until every participant of the barrier has called
    Rendezvous(Arc<Barrier>),
}

/// Decrements the in-flight counter when a call ends or is cancelled
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn key(coordinates: Coordinates) -> String {
    format!("{},{}", coordinates.latitude, coordinates.longitude)
}

/// Scripted [`WeatherClient`]. Locations without a script succeed.
///
/// A successful current reading reports the latitude as its temperature so
/// tests can tell entries apart.
#[derive(Default)]
pub struct ScriptedClient {
    behaviours: Mutex<HashMap<String, Behaviour>>,
    stalled_once: Mutex<HashSet<String>>,
    queries: Mutex<Vec<WeatherQuery>>,
    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    /// Signalled whenever a call starts
    pub started: Notify,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, location: &Location, behaviour: Behaviour) {
        let coordinates = location.coordinates().unwrap();
        self.behaviours
            .lock()
            .unwrap()
            .insert(key(coordinates), behaviour);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<WeatherQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn behaviour(&self, coordinates: Coordinates) -> Behaviour {
        let key = key(coordinates);
        let behaviour = self
            .behaviours
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or(Behaviour::Succeed);

        match behaviour {
            Behaviour::StallFirstCall => {
                if self.stalled_once.lock().unwrap().insert(key) {
                    Behaviour::Stall
                } else {
                    Behaviour::Succeed
                }
            }
            other => other,
        }
    }
}

pub fn payload(coordinates: Coordinates, query: WeatherQuery) -> WeatherPayload {
    let current = CurrentReading {
        observed_at: Utc::now(),
        temperature: coordinates.latitude as f32,
        apparent_temperature: Some(coordinates.latitude as f32 - 2.0),
        relative_humidity: Some(70),
        wind_speed: Some(12.0),
        pressure: Some(1008.0),
        weather_code: 2,
        is_day: true,
    };

    match query {
        WeatherQuery::Current => WeatherPayload {
            current: Some(current),
            ..Default::default()
        },
        WeatherQuery::Hourly(range) => {
            let mut hourly = Vec::new();
            let mut day = range.start;
            while day <= range.end {
                for hour in [0, 12] {
                    hourly.push(HourlyReading {
                        time: day.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap()),
                        temperature: Some(10.0 + hour as f32),
                        precipitation_probability: Some(30),
                        weather_code: Some(61),
                        is_day: Some(hour == 12),
                    });
                }
                day = day.checked_add_days(Days::new(1)).unwrap();
            }
            WeatherPayload {
                hourly,
                ..Default::default()
            }
        }
        WeatherQuery::CurrentDay => WeatherPayload {
            current: Some(current),
            hourly: Vec::new(),
            daily: vec![DailyReading {
                date: NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
                temperature_max: Some(18.0),
                temperature_min: Some(7.0),
                uv_index_max: Some(4.2),
                sunrise: NaiveDate::from_ymd_opt(2026, 10, 15)
                    .unwrap()
                    .and_hms_opt(7, 41, 0),
                sunset: NaiveDate::from_ymd_opt(2026, 10, 15)
                    .unwrap()
                    .and_hms_opt(18, 37, 0),
            }],
        },
    }
}

#[async_trait]
impl WeatherClient for ScriptedClient {
    async fn fetch(&self, coordinates: Coordinates, query: WeatherQuery) -> Result<WeatherPayload> {
        let _in_flight = InFlight::enter(&self.in_flight);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query);
        self.started.notify_one();

        match self.behaviour(coordinates) {
            Behaviour::Succeed | Behaviour::StallFirstCall => {}
            Behaviour::Fail => return Err(WeatherError::network("connection refused")),
            Behaviour::Stall => futures::future::pending::<()>().await,
            Behaviour::Delay(delay) => tokio::time::sleep(delay).await,
            Behaviour::Rendezvous(barrier) => {
                barrier.wait().await;
            }
        }

        Ok(payload(coordinates, query))
    }
}

/// Hand-driven saved-location subscription
pub fn location_feed() -> (mpsc::UnboundedSender<Result<Vec<Location>>>, LocationStream) {
    let (sender, receiver) = mpsc::unbounded();
    (sender, receiver.boxed())
}

pub fn location(name: &str, latitude: &str, longitude: &str) -> Location {
    Location::new(name, latitude, longitude)
}
