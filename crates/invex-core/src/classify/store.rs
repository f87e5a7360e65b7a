//! Record store contracts and the in-memory implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::StoreError;
use crate::models::record::{IdentityKey, InvoiceRecord, RecurrenceKey};

/// Lookup side of a record store.
///
/// Absence is `Ok(None)`. An `Err` means the lookup itself failed and
/// must never be read as "no match".
pub trait RecordLookup: Send + Sync {
    /// Find a record with the same identity key.
    fn find_by_identity(&self, key: &IdentityKey<'_>)
        -> Result<Option<InvoiceRecord>, StoreError>;

    /// Find a record with the same recurrence key.
    fn find_by_recurrence(&self, key: &RecurrenceKey<'_>)
        -> Result<Option<InvoiceRecord>, StoreError>;
}

/// Insert side of a record store.
pub trait RecordSink: Send + Sync {
    /// Append one record.
    fn insert_one(&self, record: &InvoiceRecord) -> Result<(), StoreError>;
}

/// A full record store: lookups plus inserts.
pub trait RecordStore: RecordLookup + RecordSink {}

impl<T: RecordLookup + RecordSink> RecordStore for T {}

/// In-memory store over a vector: linear scan, exact key equality,
/// insertion order preserved. Backs the unit tests and the file-based
/// persistence layer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<InvoiceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with existing records.
    pub fn with_records(records: Vec<InvoiceRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Snapshot of all records in insertion order.
    pub fn records(&self) -> Vec<InvoiceRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<InvoiceRecord>> {
        // Records are plain data; a poisoned lock still holds a usable vector.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordLookup for MemoryStore {
    fn find_by_identity(
        &self,
        key: &IdentityKey<'_>,
    ) -> Result<Option<InvoiceRecord>, StoreError> {
        Ok(self.lock().iter().find(|r| r.identity_key() == *key).cloned())
    }

    fn find_by_recurrence(
        &self,
        key: &RecurrenceKey<'_>,
    ) -> Result<Option<InvoiceRecord>, StoreError> {
        Ok(self
            .lock()
            .iter()
            .find(|r| r.recurrence_key() == *key)
            .cloned())
    }
}

impl RecordSink for MemoryStore {
    fn insert_one(&self, record: &InvoiceRecord) -> Result<(), StoreError> {
        self.lock().push(record.clone());
        Ok(())
    }
}
