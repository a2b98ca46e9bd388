// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use thiserror::Error;

use crate::record::RecordId;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Read access to the records of one domain type.
#[async_trait]
pub trait RecordStore: Send + Sync {
    type Record: Send + Sync;

    /// Fetch every record whose primary key is in `ids`, in one query.
    ///
    /// Order and duplicate handling are up to the store (an SQL `IN` lookup
    /// returns each row once, in table order).
    async fn find_by_ids(&self, ids: &[RecordId]) -> Result<Vec<Self::Record>, StorageError>;

    /// Every record of the type, used to rebuild the index.
    async fn find_all(&self) -> Result<Vec<Self::Record>, StorageError>;
}
