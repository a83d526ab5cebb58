//! In-memory repositories, used by the `memory` backend and in tests.

use invoicekit_model::Record;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{StorageError, StorageResult};
use crate::repository::{Repository, paginate};

#[derive(Debug)]
struct MemoryState<T> {
    records: BTreeMap<i64, T>,
    next_id: i64,
}

/// Repository holding records in a `BTreeMap` keyed by id.
///
/// Ids are never reused, even after a delete.
#[derive(Debug)]
pub struct MemoryRepository<T: Record> {
    state: Mutex<MemoryState<T>>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                records: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> StorageResult<usize> {
        Ok(self.lock()?.records.len())
    }

    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.lock()?.records.is_empty())
    }

    /// Drops every record and restarts ids at 1.
    pub fn clear(&self) -> StorageResult<()> {
        let mut state = self.lock()?;
        state.records.clear();
        state.next_id = 1;
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, MemoryState<T>>> {
        self.state
            .lock()
            .map_err(|_| StorageError::LockPoisoned("memory repository"))
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn create(&self, mut entity: T) -> StorageResult<T> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id = id
            .checked_add(1)
            .ok_or_else(|| StorageError::SequenceExhausted(T::TYPE_NAME.to_string()))?;
        entity.set_id(id);
        state.records.insert(id, entity.clone());
        Ok(entity)
    }

    fn get_by_id(&self, id: i64) -> StorageResult<Option<T>> {
        Ok(self.lock()?.records.get(&id).cloned())
    }

    fn get_all(&self, skip: usize, limit: usize) -> StorageResult<Vec<T>> {
        let state = self.lock()?;
        Ok(paginate(state.records.values().cloned(), skip, limit))
    }

    fn update(&self, entity: T) -> StorageResult<T> {
        let mut state = self.lock()?;
        let id = entity.id();
        match state.records.get_mut(&id) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(StorageError::NotFound {
                kind: T::TYPE_NAME,
                id,
            }),
        }
    }

    fn delete(&self, id: i64) -> StorageResult<bool> {
        Ok(self.lock()?.records.remove(&id).is_some())
    }
}
