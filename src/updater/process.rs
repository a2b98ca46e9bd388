// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Child-process index updater.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::UpdaterConfig;

use super::{IndexCallError, IndexUpdater, UpdateRequest};

/// Runs the updater program once per update and captures its output.
///
/// Arguments are passed as separate argv entries, never through a shell.
/// A non-zero exit status is a failed call. With a timeout set, the child is
/// killed when the limit is hit.
#[derive(Debug, Clone)]
pub struct ProcessUpdater {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessUpdater {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    pub fn from_config(config: &UpdaterConfig) -> Self {
        Self {
            program: PathBuf::from(&config.program),
            timeout: config.timeout(),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl IndexUpdater for ProcessUpdater {
    async fn update(&self, request: &UpdateRequest) -> Result<Vec<String>, IndexCallError> {
        let mut command = Command::new(&self.program);
        command
            .args(request.args())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(
            program = %self.program.display(),
            identity = %request.identity,
            operation = %request.operation,
            "Running index updater"
        );

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| IndexCallError::Timeout(limit))?,
            None => command.output().await,
        }
        .map_err(|source| IndexCallError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .map(str::to_string)
            .collect();

        if output.status.success() {
            Ok(lines)
        } else {
            Err(IndexCallError::Failed {
                status: output.status.to_string(),
                lines,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = UpdaterConfig {
            program: "/opt/zoom/update.pl".into(),
            timeout_ms: Some(250),
        };
        let updater = ProcessUpdater::from_config(&config);

        assert_eq!(updater.program(), Path::new("/opt/zoom/update.pl"));
        assert_eq!(updater.timeout, Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        use crate::config::IndexTargetConfig;
        use crate::updater::UpdateOperation;

        let updater = ProcessUpdater::new("/nonexistent/zoom-updater-for-tests");
        let request = UpdateRequest {
            target: IndexTargetConfig::new("h", "db"),
            identity: "Book:1".into(),
            payload: "<record/>".into(),
            operation: UpdateOperation::SpecialUpdate,
        };

        assert!(matches!(
            updater.update(&request).await,
            Err(IndexCallError::Spawn { .. })
        ));
    }
}
