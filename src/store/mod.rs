//! Saved location persistence
//!
//! [`LocationStore`] keeps an insertion-ordered list of saved places. Each
//! record carries a soft-delete flag so a deletion can be undone until the
//! record is permanently removed. Every change to the active (not deleted)
//! list is published to observers.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::models::Location;
use crate::{Result, WeatherError};

pub mod fjall_store;
pub mod memory;

pub use fjall_store::FjallLocationStore;
pub use memory::MemoryLocationStore;

/// Live sequence of saved-location snapshots, current snapshot first
pub type LocationStream = BoxStream<'static, Result<Vec<Location>>>;

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Subscribe to the active saved locations. Yields the current list
    /// immediately and again after every change. Ends when the store goes away.
    fn observe_saved_locations(&self) -> LocationStream;

    /// Active saved locations in insertion order
    async fn saved_locations(&self) -> Result<Vec<Location>>;

    /// Soft-deleted locations that can still be restored
    async fn deleted_locations(&self) -> Result<Vec<Location>>;

    /// Save a location. Saving a known place replaces it in position and
    /// clears its deleted flag.
    async fn save(&self, location: Location) -> Result<()>;

    /// Mark a location deleted while keeping it recoverable
    async fn soft_delete(&self, location: &Location) -> Result<()>;

    /// Undo a soft delete
    async fn restore(&self, location: &Location) -> Result<()>;

    /// Remove a location for good
    async fn permanent_delete(&self, location: &Location) -> Result<()>;
}

/// One stored entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocationRecord {
    pub location: Location,
    pub is_deleted: bool,
}

/// A change to the stored records
#[derive(Debug, Clone)]
pub(crate) enum Mutation {
    Save(Location),
    SoftDelete(Location),
    Restore(Location),
    PermanentDelete(Location),
}

impl Mutation {
    /// Apply to `records`. Returns whether anything changed.
    pub(crate) fn apply(self, records: &mut Vec<SavedLocationRecord>) -> Result<bool> {
        match self {
            Mutation::Save(location) => Ok(upsert(records, location)),
            Mutation::SoftDelete(location) => match position(records, &location) {
                Some(i) if !records[i].is_deleted => {
                    records[i].is_deleted = true;
                    Ok(true)
                }
                _ => Ok(false),
            },
            Mutation::Restore(location) => match position(records, &location) {
                Some(i) => {
                    let changed = records[i].is_deleted;
                    records[i].is_deleted = false;
                    Ok(changed)
                }
                None => Err(WeatherError::persistence(format!(
                    "No saved location at {}",
                    location.format_coordinates()
                ))),
            },
            Mutation::PermanentDelete(location) => match position(records, &location) {
                Some(i) => {
                    records.remove(i);
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }
}

/// Insert `location` as active, replacing a record for the same place in
/// position. Returns whether anything changed.
pub(crate) fn upsert(records: &mut Vec<SavedLocationRecord>, location: Location) -> bool {
    let record = SavedLocationRecord {
        location,
        is_deleted: false,
    };
    match position(records, &record.location) {
        Some(i) if records[i] == record => false,
        Some(i) => {
            records[i] = record;
            true
        }
        None => {
            records.push(record);
            true
        }
    }
}

fn position(records: &[SavedLocationRecord], target: &Location) -> Option<usize> {
    records
        .iter()
        .position(|record| record.location.same_place(target))
}

pub(crate) fn active_locations(records: &[SavedLocationRecord]) -> Vec<Location> {
    records
        .iter()
        .filter(|record| !record.is_deleted)
        .map(|record| record.location.clone())
        .collect()
}

pub(crate) fn deleted_locations(records: &[SavedLocationRecord]) -> Vec<Location> {
    records
        .iter()
        .filter(|record| record.is_deleted)
        .map(|record| record.location.clone())
        .collect()
}

/// Broadcasts the active snapshot to observers
pub(crate) struct SnapshotPublisher {
    sender: watch::Sender<Vec<Location>>,
}

impl SnapshotPublisher {
    pub(crate) fn new(records: &[SavedLocationRecord]) -> Self {
        let (sender, _) = watch::channel(active_locations(records));
        Self { sender }
    }

    /// Publish the active snapshot if it differs from the last one
    pub(crate) fn publish(&self, records: &[SavedLocationRecord]) {
        let snapshot = active_locations(records);
        let published = self.sender.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
        if published {
            tracing::debug!(
                "Published saved location snapshot to {} observers",
                self.sender.receiver_count()
            );
        }
    }

    pub(crate) fn subscribe(&self) -> LocationStream {
        let receiver = self.sender.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let snapshot = receiver.borrow_and_update().clone();
            Some((Ok(snapshot), (receiver, false)))
        })
        .boxed()
    }
}
