// Record Store - one ordered in-memory collection per entity kind
//
// Ids come from a monotonic counter: a deleted id is never handed out
// again, so delete-then-add cannot collide with a surviving reference.

use crate::error::StoreResult;
use crate::record::{Record, RecordId};
use tracing::debug;

/// Backing storage behind a [`crate::facade::Facade`].
///
/// Implemented in memory ([`MemoryStore`]) and over HTTP
/// (`crate::client::HttpStore`).
pub trait Repository<T: Record> {
    /// All records, insertion order
    fn list(&self) -> StoreResult<Vec<T>>;

    fn get(&self, id: RecordId) -> StoreResult<Option<T>>;

    /// Store a new record; its id is assigned here, whatever it was before
    fn add(&mut self, record: T) -> StoreResult<T>;

    /// Replace the record with the same id. `None` when no such record.
    fn update(&mut self, record: T) -> StoreResult<Option<T>>;

    /// Unknown ids are a silent no-op
    fn remove(&mut self, id: RecordId) -> StoreResult<()>;
}

/// Process-lifetime collection. Never fails.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    records: Vec<T>,
    next_id: RecordId,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        MemoryStore {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Start from fixtures; the counter continues after the highest seed id
    pub fn with_records(records: Vec<T>) -> Self {
        let next_id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        MemoryStore { records, next_id }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrowing view, for callers that do not need owned copies
    pub fn records(&self) -> &[T] {
        &self.records
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for MemoryStore<T> {
    fn list(&self) -> StoreResult<Vec<T>> {
        Ok(self.records.clone())
    }

    fn get(&self, id: RecordId) -> StoreResult<Option<T>> {
        Ok(self.position(id).map(|i| self.records[i].clone()))
    }

    fn add(&mut self, mut record: T) -> StoreResult<T> {
        record.set_id(self.next_id);
        self.next_id += 1;
        debug!(kind = %T::KIND, id = record.id(), "record added");
        self.records.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, record: T) -> StoreResult<Option<T>> {
        match self.position(record.id()) {
            Some(i) => {
                debug!(kind = %T::KIND, id = record.id(), "record updated");
                self.records[i] = record.clone();
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn remove(&mut self, id: RecordId) -> StoreResult<()> {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        if self.records.len() != before {
            debug!(kind = %T::KIND, id, "record removed");
        }
        Ok(())
    }
}
