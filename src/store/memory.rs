use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{LocationStore, LocationStream, Mutation, SavedLocationRecord, SnapshotPublisher};
use crate::Result;
use crate::models::Location;

/// Non-persistent store, for tests and ephemeral sessions
pub struct MemoryLocationStore {
    records: Mutex<Vec<SavedLocationRecord>>,
    publisher: SnapshotPublisher,
}

impl MemoryLocationStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::with_locations(Vec::new())
    }

    /// Create a store pre-populated with active locations
    #[must_use]
    pub fn with_locations(locations: Vec<Location>) -> Self {
        let mut records = Vec::new();
        for location in locations {
            super::upsert(&mut records, location);
        }
        Self {
            publisher: SnapshotPublisher::new(&records),
            records: Mutex::new(records),
        }
    }

    async fn write(&self, mutation: Mutation) -> Result<()> {
        let mut records = self.records.lock().await;
        if mutation.apply(&mut records)? {
            self.publisher.publish(&records);
        }
        Ok(())
    }
}

impl Default for MemoryLocationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationStore for MemoryLocationStore {
    fn observe_saved_locations(&self) -> LocationStream {
        self.publisher.subscribe()
    }

    async fn saved_locations(&self) -> Result<Vec<Location>> {
        Ok(super::active_locations(&self.records.lock().await))
    }

    async fn deleted_locations(&self) -> Result<Vec<Location>> {
        Ok(super::deleted_locations(&self.records.lock().await))
    }

    async fn save(&self, location: Location) -> Result<()> {
        self.write(Mutation::Save(location)).await
    }

    async fn soft_delete(&self, location: &Location) -> Result<()> {
        self.write(Mutation::SoftDelete(location.clone())).await
    }

    async fn restore(&self, location: &Location) -> Result<()> {
        self.write(Mutation::Restore(location.clone())).await
    }

    async fn permanent_delete(&self, location: &Location) -> Result<()> {
        self.write(Mutation::PermanentDelete(location.clone())).await
    }
}
