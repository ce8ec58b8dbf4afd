use async_trait::async_trait;
use fjall::Keyspace;
use std::path::Path;
use tokio::sync::{Mutex, RwLock};
use tokio::task;

use super::{LocationStore, LocationStream, Mutation, SavedLocationRecord, SnapshotPublisher};
use crate::models::Location;
use crate::{Result, WeatherError};

const RECORDS_KEY: &str = "saved_locations";

fn storage_error(err: fjall::Error) -> WeatherError {
    WeatherError::persistence(err.to_string())
}

fn read_records(store: Keyspace) -> Result<Vec<SavedLocationRecord>> {
    let stored = store
        .get(RECORDS_KEY.as_bytes().to_vec())
        .map_err(storage_error)?
        .map(|v| v.to_vec());
    match stored {
        Some(bytes) => Ok(postcard::from_bytes(&bytes)?),
        None => Ok(Vec::new()),
    }
}

/// Saved locations persisted in a fjall keyspace.
///
/// The whole record list lives under a single key. Writes are serialised and
/// only become visible to readers once they are on disk, so reads never wait
/// on a write in progress.
pub struct FjallLocationStore {
    store: Keyspace,
    writer: Mutex<()>,
    records: RwLock<Vec<SavedLocationRecord>>,
    publisher: SnapshotPublisher,
}

impl FjallLocationStore {
    /// Open or create the store in `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)?;

        let db = fjall::Database::builder(path).open().map_err(storage_error)?;
        let store = db
            .keyspace("locations", fjall::KeyspaceCreateOptions::default)
            .map_err(storage_error)?;
        let records = read_records(store.clone())?;

        tracing::info!(
            "Opened location store at {} with {} records",
            path.display(),
            records.len()
        );

        Ok(Self {
            publisher: SnapshotPublisher::new(&records),
            writer: Mutex::new(()),
            records: RwLock::new(records),
            store,
        })
    }

    #[tracing::instrument(name = "write_locations", level = "debug", skip(self))]
    async fn write(&self, mutation: Mutation) -> Result<()> {
        let _writing = self.writer.lock().await;
        let mut updated = self.records.read().await.clone();
        if !mutation.apply(&mut updated)? {
            tracing::debug!("Location store unchanged");
            return Ok(());
        }

        let bytes = postcard::to_stdvec(&updated)?;
        let store = self.store.clone();
        let key = RECORDS_KEY.as_bytes().to_vec();
        task::spawn_blocking(move || store.insert(key, bytes))
            .await?
            .map_err(storage_error)?;

        let mut records = self.records.write().await;
        *records = updated;
        self.publisher.publish(&records);
        Ok(())
    }
}

#[async_trait]
impl LocationStore for FjallLocationStore {
    fn observe_saved_locations(&self) -> LocationStream {
        self.publisher.subscribe()
    }

    async fn saved_locations(&self) -> Result<Vec<Location>> {
        Ok(super::active_locations(&self.records.read().await))
    }

    async fn deleted_locations(&self) -> Result<Vec<Location>> {
        Ok(super::deleted_locations(&self.records.read().await))
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
