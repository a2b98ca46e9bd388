// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index sync dispatcher.
//!
//! The [`IndexSyncDispatcher`] is called by the storage layer after a record
//! is committed ([`on_save`](IndexSyncDispatcher::on_save)) or deleted
//! ([`on_destroy`](IndexSyncDispatcher::on_destroy)):
//!
//! ```text
//! record ──→ registry config ──→ RecordSerializer ──→ FieldRecord
//!                                      │
//!                           DatabaseRouter ──→ IndexTargetConfig
//!                                      │
//!                 IndexUpdater(specialUpdate | recordDelete) ──→ output lines
//! ```
//!
//! Indexing is best effort. Failures are logged and returned as
//! [`SyncError`] values; the storage write that triggered them stands.
//! Each call awaits its own update and spawns nothing, so concurrent calls
//! share no mutable state.
//!
//! # Example
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use zoom_sync::{IndexSyncDispatcher, IndexedRecord, ProcessUpdater, SyncRegistry};
//! # async fn example(registry: Arc<SyncRegistry>, record: &dyn IndexedRecord) {
//! let dispatcher = IndexSyncDispatcher::new(
//!     registry,
//!     Arc::new(ProcessUpdater::new("/opt/zoom/zoom_ext_services_action.pl")),
//! );
//!
//! // After the storage transaction commits:
//! let _ = dispatcher.on_save(record).await;
//! # }
//! ```

mod types;

pub use types::{RebuildReport, SyncError, UpdateReport};

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::metrics;
use crate::record::{IndexIdentity, IndexedRecord, RecordSerializer};
use crate::registry::SyncRegistry;
use crate::routing::DatabaseRouter;
use crate::storage::traits::{RecordStore, StorageError};
use crate::updater::{IndexUpdater, UpdateOperation, UpdateRequest};

pub struct IndexSyncDispatcher {
    registry: Arc<SyncRegistry>,
    updater: Arc<dyn IndexUpdater>,
}

impl IndexSyncDispatcher {
    pub fn new(registry: Arc<SyncRegistry>, updater: Arc<dyn IndexUpdater>) -> Self {
        Self { registry, updater }
    }

    #[must_use]
    pub fn registry(&self) -> &SyncRegistry {
        &self.registry
    }

    /// Insert or replace the record in its index.
    pub async fn on_save<R: IndexedRecord + ?Sized>(&self, record: &R) -> Result<UpdateReport, SyncError> {
        self.dispatch(record, UpdateOperation::SpecialUpdate).await
    }

    /// Remove the record from its index.
    pub async fn on_destroy<R: IndexedRecord + ?Sized>(&self, record: &R) -> Result<UpdateReport, SyncError> {
        self.dispatch(record, UpdateOperation::RecordDelete).await
    }

    /// Serialize and route a record without calling the index.
    ///
    /// Deletes carry the full payload too; the update protocol needs it.
    pub fn prepare<R: IndexedRecord + ?Sized>(
        &self,
        record: &R,
        operation: UpdateOperation,
    ) -> Result<UpdateRequest, SyncError> {
        let config = self
            .registry
            .configuration(record.type_name())
            .ok_or_else(|| SyncError::UnregisteredType(record.type_name().to_string()))?;

        let target = DatabaseRouter::resolve(&self.registry, record, &config)?;
        let field_record = RecordSerializer::serialize(record, &config);

        Ok(UpdateRequest {
            target: target.clone(),
            identity: field_record.identity().to_string(),
            payload: field_record.to_payload(),
            operation,
        })
    }

    async fn dispatch<R: IndexedRecord + ?Sized>(
        &self,
        record: &R,
        operation: UpdateOperation,
    ) -> Result<UpdateReport, SyncError> {
        let identity = IndexIdentity::of(record);
        debug!(%identity, %operation, "Index sync");

        let request = match self.prepare(record, operation) {
            Ok(request) => request,
            Err(e) => {
                error!(%identity, %operation, error = %e, "Index sync skipped");
                metrics::record_index_call(operation.as_str(), "skipped");
                return Err(e);
            }
        };

        let start = Instant::now();
        let result = self.updater.update(&request).await;
        metrics::record_index_latency(operation.as_str(), start.elapsed());

        match result {
            Ok(lines) => {
                for line in &lines {
                    debug!(%identity, %operation, "{}", line);
                }
                metrics::record_index_call(operation.as_str(), "success");
                Ok(UpdateReport {
                    identity: request.identity,
                    operation,
                    target: request.target.key(),
                    lines,
                })
            }
            Err(e) => {
                for line in e.output_lines() {
                    warn!(%identity, %operation, "{}", line);
                }
                error!(
                    %identity,
                    %operation,
                    target = %request.target.key(),
                    error = %e,
                    "Index update failed"
                );
                metrics::record_index_call(operation.as_str(), "error");
                Err(e.into())
            }
        }
    }

    /// Re-index every stored record of a type, one at a time.
    ///
    /// Records of another type are skipped. Individual failures are counted
    /// and do not stop the rebuild. Only a failure to list the records is
    /// returned as an error.
    pub async fn rebuild_index<S>(&self, type_name: &str, store: &S) -> Result<RebuildReport, StorageError>
    where
        S: RecordStore + ?Sized,
        S::Record: IndexedRecord,
    {
        let records = store.find_all().await?;
        let mut report = RebuildReport {
            total: records.len(),
            succeeded: 0,
            failed: 0,
            skipped: 0,
        };

        for record in &records {
            if record.type_name() != type_name {
                warn!(
                    type_name,
                    identity = %IndexIdentity::of(record),
                    "Skipping record of another type during rebuild"
                );
                report.skipped += 1;
                continue;
            }
            match self.on_save(record).await {
                Ok(_) => report.succeeded += 1,
                Err(_) => report.failed += 1,
            }
        }

        metrics::record_rebuild(type_name, report.succeeded, report.failed);
        if report.total > report.skipped {
            info!(
                type_name,
                total = report.total,
                succeeded = report.succeeded,
                failed = report.failed,
                skipped = report.skipped,
                "Index for {} has been rebuilt",
                type_name
            );
        } else {
            info!(type_name, "Nothing to index for {}", type_name);
        }

        Ok(report)
    }
}
