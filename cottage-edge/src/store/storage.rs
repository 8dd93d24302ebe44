//! redb-based record store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `records` | collection key | JSON text | One whole collection per key |
//!
//! Every write replaces the full value of one key. There are no partial
//! updates and no transactions spanning two keys: callers that update two
//! collections do so with two independent writes, and a reader may observe
//! one without the other.
//!
//! # Self-healing reads
//!
//! A value that no longer parses is treated as lost for that key. The read
//! returns the fallback (empty, or a caller-supplied seed) and writes the
//! fallback back immediately, so the next read is clean.
//!
//! # Change notifications
//!
//! A [`RecordStore`] handle belongs to one view. Each successful write
//! publishes a genuine [`StorageEvent`] on the shared bus, which every *other*
//! view sharing the database receives.

use redb::{Database, ReadableDatabase, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::message::{StorageEvent, ViewId};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::keys::CollectionKey;
use crate::sync::ChangeBus;

/// Table for collections: key = collection key, value = JSON text bytes
const RECORDS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("records");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Record store backed by redb, as seen from one view
#[derive(Clone)]
pub struct RecordStore {
    db: Arc<Database>,
    bus: ChangeBus,
    view: ViewId,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

impl RecordStore {
    /// Open or create the store at the given path
    ///
    /// redb commits are durable as soon as `commit()` returns, so a value
    /// written before a crash is either fully there or not at all.
    pub fn open(path: impl AsRef<Path>, bus: ChangeBus) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db, bus)
    }

    /// Open an in-memory store (tests, throwaway sessions)
    pub fn open_in_memory(bus: ChangeBus) -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db, bus)
    }

    fn init(db: Database, bus: ChangeBus) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RECORDS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db: Arc::new(db),
            bus,
            view: ViewId::new(),
        })
    }

    /// A handle for another view over the same database and bus
    pub fn open_view(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            bus: self.bus.clone(),
            view: ViewId::new(),
        }
    }

    /// The view this handle writes as
    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    // ========== Raw Values ==========

    /// Read the stored JSON text for a key
    pub fn get_raw(&self, key: CollectionKey) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RECORDS_TABLE)?;
        Ok(table
            .get(key.as_str())?
            .map(|guard| String::from_utf8_lossy(guard.value()).into_owned()))
    }

    /// Replace the stored JSON text for a key and notify other views
    pub fn set_raw(&self, key: CollectionKey, value: String) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        let old_value = {
            let mut table = txn.open_table(RECORDS_TABLE)?;
            table
                .insert(key.as_str(), value.as_bytes())?
                .map(|guard| String::from_utf8_lossy(guard.value()).into_owned())
        };
        txn.commit()?;

        self.bus.publish_storage(StorageEvent::genuine(
            self.view,
            key.as_str(),
            old_value,
            Some(value),
        ));
        Ok(())
    }

    // ========== Collections ==========

    /// Read a collection; absent → empty, unparseable → empty (persisted)
    pub fn read<T>(&self, key: CollectionKey) -> StorageResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        self.read_or_else(key, false, Vec::new)
    }

    /// Read a collection; absent or unparseable → `seed()` (persisted)
    pub fn read_or_seed<T, F>(&self, key: CollectionKey, seed: F) -> StorageResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        self.read_or_else(key, true, seed)
    }

    /// Replace a whole collection
    pub fn write<T: Serialize>(&self, key: CollectionKey, records: &[T]) -> StorageResult<()> {
        let json = serde_json::to_string(records)?;
        self.set_raw(key, json)
    }

    // ========== Documents ==========

    /// Read a single JSON document (map, scalar); absent → default,
    /// unparseable → default (persisted)
    pub fn read_document<T>(&self, key: CollectionKey) -> StorageResult<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        self.read_or_else(key, false, T::default)
    }

    pub fn write_document<T: Serialize>(&self, key: CollectionKey, document: &T) -> StorageResult<()> {
        let json = serde_json::to_string(document)?;
        self.set_raw(key, json)
    }

    // ========== Last Update ==========

    /// Last announced change (Unix millis), if any
    pub fn last_update(&self) -> StorageResult<Option<i64>> {
        let raw = self.get_raw(CollectionKey::LastUpdate)?;
        Ok(raw.and_then(|s| s.trim().trim_matches('"').parse::<i64>().ok()))
    }

    pub fn set_last_update(&self, millis: i64) -> StorageResult<()> {
        self.set_raw(CollectionKey::LastUpdate, millis.to_string())
    }

    fn read_or_else<T, F>(&self, key: CollectionKey, persist_absent: bool, fallback: F) -> StorageResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.get_raw(key)? {
            Some(raw) => match serde_json::from_str::<T>(&raw) {
                Ok(value) => Ok(value),
                Err(e) => {
                    tracing::warn!(
                        key = %key,
                        view = %self.view,
                        error = %e,
                        "Stored value is unreadable, replacing with fallback"
                    );
                    let value = fallback();
                    self.write_document(key, &value)?;
                    Ok(value)
                }
            },
            None if persist_absent => {
                let value = fallback();
                tracing::debug!(key = %key, "Seeding empty key");
                self.write_document(key, &value)?;
                Ok(value)
            }
            None => Ok(fallback()),
        }
    }
}
