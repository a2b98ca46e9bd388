// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Public types for the sync dispatcher.

use thiserror::Error;

use crate::config::TargetKey;
use crate::routing::RoutingError;
use crate::updater::{IndexCallError, UpdateOperation};

/// Why an index sync did not happen. Already logged when returned.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("type '{0}' is not registered for index sync")]
    UnregisteredType(String),
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error(transparent)]
    IndexCall(#[from] IndexCallError),
}

/// Outcome of one successful index update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub identity: String,
    pub operation: UpdateOperation,
    pub target: TargetKey,
    /// Status lines printed by the updater
    pub lines: Vec<String>,
}

/// Result of an index rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildReport {
    /// Records found in storage
    pub total: usize,
    /// Records written to the index
    pub succeeded: usize,
    /// Records that failed to serialize, route or update
    pub failed: usize,
    /// Records of another type found in the store
    pub skipped: usize,
}

impl RebuildReport {
    /// Check if every record was indexed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
