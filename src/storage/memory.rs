// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use std::collections::BTreeSet;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::record::{IndexedRecord, RecordId};
use super::traits::{RecordStore, StorageError};

/// Record store backed by a concurrent map, for tests and embedding.
///
/// Lookups behave like `WHERE id IN (...)`: each matching record once,
/// ordered by primary key.
pub struct InMemoryRecordStore<R> {
    data: DashMap<RecordId, R>,
}

impl<R: IndexedRecord + Clone> InMemoryRecordStore<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Insert or replace a record under its primary key.
    pub fn insert(&self, record: R) {
        self.data.insert(record.primary_key(), record);
    }

    pub fn remove(&self, id: RecordId) -> Option<R> {
        self.data.remove(&id).map(|(_, record)| record)
    }

    pub fn get(&self, id: RecordId) -> Option<R> {
        self.data.get(&id).map(|r| r.value().clone())
    }

    /// Get current record count
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<R: IndexedRecord + Clone> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: IndexedRecord + Clone> FromIterator<R> for InMemoryRecordStore<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

#[async_trait]
impl<R: IndexedRecord + Clone> RecordStore for InMemoryRecordStore<R> {
    type Record = R;

    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<R>, StorageError> {
        let wanted: BTreeSet<RecordId> = ids.iter().copied().collect();
        Ok(wanted.into_iter().filter_map(|id| self.get(id)).collect())
    }

    async fn find_all(&self) -> Result<Vec<R>, StorageError> {
        let mut ids: Vec<RecordId> = self.data.iter().map(|r| *r.key()).collect();
        ids.sort_unstable();
        Ok(ids.into_iter().filter_map(|id| self.get(id)).collect())
    }
}
