// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search hits → domain records.
//!
//! ```text
//! ResultSet ──→ parse each hit's XML ──→ localControlNumber "Book:42"
//!                                             │
//!                                             └─→ 42 ──→ one find_by_ids(&[..]) call
//! ```
//!
//! Records come back in whatever order the store returns them, not in
//! ranking order.

use tracing::{debug, warn};

use crate::metrics;
use crate::record::{primary_key_from_payload, RecordId};
use crate::storage::traits::{RecordStore, StorageError};

use super::client::ResultSet;

pub struct ResultMapper;

impl ResultMapper {
    /// Primary keys of every well-formed hit, in hit order, duplicates kept.
    /// Malformed hits are logged and skipped.
    pub fn primary_keys(result_set: ResultSet) -> Vec<RecordId> {
        let mut ids = Vec::with_capacity(result_set.len());
        for (position, hit) in result_set.into_iter().enumerate() {
            match primary_key_from_payload(hit.xml()) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    warn!(position, error = %e, "Skipping malformed search hit");
                    metrics::record_malformed_hit();
                }
            }
        }
        ids
    }

    /// Resolve a result set to records with a single batch lookup.
    pub async fn map<S>(result_set: ResultSet, store: &S) -> Result<Vec<S::Record>, StorageError>
    where
        S: RecordStore + ?Sized,
    {
        if result_set.is_empty() {
            return Ok(Vec::new());
        }

        let hits = result_set.len();
        let ids = Self::primary_keys(result_set);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(hits, keys = ids.len(), "Fetching search hits from storage");
        store.find_by_ids(&ids).await
    }
}
