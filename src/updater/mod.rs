// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index update seam.
//!
//! Writes to the index go through an Extended Services update, performed
//! outside this crate. [`IndexUpdater`] is that boundary; [`ProcessUpdater`]
//! is the default implementation, which runs the updater program once per call.
//!
//! # Positional arguments
//!
//! ```text
//! <host> <port> <identity> <record> <specialUpdate|recordDelete> <database> <user> <password>
//! ```

mod process;

pub use process::ProcessUpdater;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::IndexTargetConfig;

/// Kind of index update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOperation {
    /// Insert, or replace the record with the same identity
    SpecialUpdate,
    /// Remove the record; the full payload is still required
    RecordDelete,
}

impl UpdateOperation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpecialUpdate => "specialUpdate",
            Self::RecordDelete => "recordDelete",
        }
    }
}

impl fmt::Display for UpdateOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one update call needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub target: IndexTargetConfig,
    pub identity: String,
    pub payload: String,
    pub operation: UpdateOperation,
}

impl UpdateRequest {
    /// Positional arguments for the updater, in wire order.
    #[must_use]
    pub fn args(&self) -> [String; 8] {
        [
            self.target.host.clone(),
            self.target.port.to_string(),
            self.identity.clone(),
            self.payload.clone(),
            self.operation.as_str().to_string(),
            self.target.database_name.clone(),
            self.target.username.clone(),
            self.target.password.clone(),
        ]
    }
}

#[derive(Error, Debug)]
pub enum IndexCallError {
    #[error("Failed to launch index updater '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Index updater timed out after {0:?}")]
    Timeout(Duration),
    #[error("Index updater exited with {status}")]
    Failed { status: String, lines: Vec<String> },
    /// For `IndexUpdater` implementations that reach the index over RPC
    /// rather than a child process.
    #[error("Index update call failed: {0}")]
    Transport(String),
}

impl IndexCallError {
    /// Output captured before the failure, if any.
    #[must_use]
    pub fn output_lines(&self) -> &[String] {
        match self {
            Self::Failed { lines, .. } => lines,
            _ => &[],
        }
    }
}

/// Applies one update to an index instance and returns its status output.
#[async_trait]
pub trait IndexUpdater: Send + Sync {
    async fn update(&self, request: &UpdateRequest) -> Result<Vec<String>, IndexCallError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_wire_names() {
        assert_eq!(UpdateOperation::SpecialUpdate.to_string(), "specialUpdate");
        assert_eq!(UpdateOperation::RecordDelete.as_str(), "recordDelete");
    }

    #[test]
    fn test_args_order() {
        let request = UpdateRequest {
            target: IndexTargetConfig::new("zebra", "public").with_port(9999).with_credentials("admin", "pw"),
            identity: "Book:1".into(),
            payload: "<record/>".into(),
            operation: UpdateOperation::RecordDelete,
        };

        assert_eq!(
            request.args(),
            ["zebra", "9999", "Book:1", "<record/>", "recordDelete", "public", "admin", "pw"].map(String::from)
        );
    }

    #[test]
    fn test_output_lines() {
        let failed = IndexCallError::Failed { status: "exit status: 1".into(), lines: vec!["bad".into()] };
        assert_eq!(failed.output_lines(), ["bad".to_string()]);
        assert!(IndexCallError::Timeout(Duration::from_secs(1)).output_lines().is_empty());
    }
}
