//! Live weather for every saved location
//!
//! Each location-set snapshot from the store starts one aggregation: a fetch
//! per location, run concurrently, reassembled in saved order. A newer
//! snapshot drops the aggregation still in flight, so a stale list is never
//! emitted after a fresher one.

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::fetch;
use crate::config::StreamConfig;
use crate::models::{BriefWeatherDetails, Location};
use crate::store::LocationStream;
use crate::weather::WeatherClient;
use crate::{Result, WeatherError};

/// Ordered snapshots of brief weather, one entry per saved location
pub type BriefWeatherStream = BoxStream<'static, Result<Vec<BriefWeatherDetails>>>;

type Aggregation = BoxFuture<'static, Vec<BriefWeatherDetails>>;

enum Event {
    Locations(Option<Result<Vec<Location>>>),
    Aggregated(Vec<BriefWeatherDetails>),
}

struct Aggregator {
    client: Arc<dyn WeatherClient>,
    config: StreamConfig,
    /// `None` once the store subscription has ended
    locations: Option<LocationStream>,
    pending: Option<Aggregation>,
    closed: bool,
}

impl Aggregator {
    fn aggregate(&self, locations: Vec<Location>) -> Aggregation {
        let limit = match self.config.max_concurrent_fetches {
            0 => locations.len().max(1),
            n => n,
        };
        let timeout = self.config.fetch_timeout();
        let client = Arc::clone(&self.client);

        debug!(
            "Aggregating weather for {} saved locations ({} at a time)",
            locations.len(),
            limit
        );

        stream::iter(locations)
            .map(move |location| fetch::brief_weather(Arc::clone(&client), location, timeout))
            .buffered(limit)
            .collect::<Vec<_>>()
            .boxed()
    }

    fn on_locations(&mut self, update: Option<Result<Vec<Location>>>) {
        match update {
            Some(Ok(locations)) => {
                if self.pending.is_some() {
                    debug!("Saved locations changed, discarding in-flight aggregation");
                }
                self.pending = Some(self.aggregate(locations));
            }
            Some(Err(e)) => warn!("Skipping unreadable saved location update: {}", e),
            None => {
                debug!("Saved location subscription ended");
                self.locations = None;
            }
        }
    }

    async fn next_snapshot(&mut self) -> Option<Result<Vec<BriefWeatherDetails>>> {
        loop {
            if self.closed {
                return None;
            }

            let Some(locations) = self.locations.as_mut() else {
                if let Some(pending) = self.pending.take() {
                    return Some(Ok(pending.await));
                }
                self.closed = true;
                error!("Saved location subscription closed, ending weather stream");
                return Some(Err(WeatherError::SubscriptionClosed));
            };

            let event = match self.pending.as_mut() {
                Some(pending) => tokio::select! {
                    biased;
                    update = locations.next() => Event::Locations(update),
                    snapshot = pending => Event::Aggregated(snapshot),
                },
                None => Event::Locations(locations.next().await),
            };

            match event {
                Event::Locations(update) => self.on_locations(update),
                Event::Aggregated(snapshot) => {
                    self.pending = None;
                    return Some(Ok(snapshot));
                }
            }
        }
    }
}

/// Build the aggregate stream over `locations`.
///
/// Per-location failures show up as `Empty` entries and never end the
/// stream. When the store subscription ends, the latest aggregation is still
/// delivered, followed by a single [`WeatherError::SubscriptionClosed`].
/// Dropping the stream cancels every fetch in flight.
pub fn saved_locations_weather(
    client: Arc<dyn WeatherClient>,
    locations: LocationStream,
    config: StreamConfig,
) -> BriefWeatherStream {
    let aggregator = Aggregator {
        client,
        config,
        locations: Some(locations),
        pending: None,
        closed: false,
    };

    stream::unfold(aggregator, |mut aggregator| async move {
        let snapshot = aggregator.next_snapshot().await?;
        Some((snapshot, aggregator))
    })
    .boxed()
}
