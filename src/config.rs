// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Configuration for index synchronization.
//!
//! # Example
//!
//! ```
//! use zoom_sync::ZoomSyncConfig;
//!
//! let config = ZoomSyncConfig::from_json(r#"{
//!     "targets": [
//!         { "host": "zebra.local", "database_name": "public", "username": "admin", "password": "secret" }
//!     ],
//!     "types": {
//!         "Book": { "fields": ["title", "author"], "save_to_public_zoom": ["zebra.local", "public"] }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(config.targets[0].port, 210);
//! assert_eq!(config.updater.program, "zoom_ext_services_action.pl");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration: index targets, per-type sync options and the updater.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoomSyncConfig {
    /// Every addressable index instance (credentials included)
    #[serde(default)]
    pub targets: Vec<IndexTargetConfig>,

    /// Sync options keyed by domain type name
    #[serde(default)]
    pub types: BTreeMap<String, SyncOptions>,

    /// External updater settings
    #[serde(default)]
    pub updater: UpdaterConfig,
}

impl ZoomSyncConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// One addressable index instance.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct IndexTargetConfig {
    pub host: String,

    /// Z39.50 port (default: 210)
    #[serde(default = "default_port")]
    pub port: u16,

    pub database_name: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

impl IndexTargetConfig {
    pub fn new(host: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            database_name: database_name.into(),
            username: String::new(),
            password: String::new(),
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// The `(host, database_name)` key this target is registered under.
    #[must_use]
    pub fn key(&self) -> TargetKey {
        TargetKey::new(self.host.clone(), self.database_name.clone())
    }
}

// Passwords stay out of logs.
impl fmt::Debug for IndexTargetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexTargetConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Lookup key for a registered index target.
///
/// Deserializes from a `[host, database_name]` pair, the shape used by the
/// `save_to_public_zoom` / `save_to_private_zoom` options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct TargetKey {
    pub host: String,
    pub database_name: String,
}

impl TargetKey {
    pub fn new(host: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            database_name: database_name.into(),
        }
    }
}

impl From<(String, String)> for TargetKey {
    fn from((host, database_name): (String, String)) -> Self {
        Self { host, database_name }
    }
}

impl From<TargetKey> for (String, String) {
    fn from(key: TargetKey) -> Self {
        (key.host, key.database_name)
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.database_name)
    }
}

/// Per-type sync options, as declared by the application when it registers a
/// domain type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SyncOptions {
    /// Fields to index, in order. `None` indexes every attribute.
    #[serde(default)]
    pub fields: Option<Vec<String>>,

    /// Index the first field's value verbatim instead of a composed record
    #[serde(default)]
    pub raw: bool,

    #[serde(default)]
    pub save_to_public_zoom: Option<TargetKey>,

    #[serde(default)]
    pub save_to_private_zoom: Option<TargetKey>,
}

impl SyncOptions {
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    #[must_use]
    pub fn public_zoom(mut self, host: impl Into<String>, database_name: impl Into<String>) -> Self {
        self.save_to_public_zoom = Some(TargetKey::new(host, database_name));
        self
    }

    #[must_use]
    pub fn private_zoom(mut self, host: impl Into<String>, database_name: impl Into<String>) -> Self {
        self.save_to_private_zoom = Some(TargetKey::new(host, database_name));
        self
    }
}

/// Settings for the external index updater program.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdaterConfig {
    /// Path of the updater executable
    #[serde(default = "default_updater_program")]
    pub program: String,

    /// Kill the updater if it runs longer than this (default: no limit)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl UpdaterConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn default_port() -> u16 { 210 }
fn default_updater_program() -> String { "zoom_ext_services_action.pl".to_string() }

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            program: default_updater_program(),
            timeout_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ZoomSyncConfig::default();
        assert!(config.targets.is_empty());
        assert!(config.types.is_empty());
        assert_eq!(config.updater.program, "zoom_ext_services_action.pl");
        assert_eq!(config.updater.timeout(), None);
    }

    #[test]
    fn test_target_key_from_pair() {
        let options: SyncOptions = serde_json::from_str(
            r#"{ "save_to_public_zoom": ["z.example.org", "pub"], "save_to_private_zoom": ["z.example.org", "priv"] }"#,
        )
        .unwrap();

        assert_eq!(options.save_to_public_zoom, Some(TargetKey::new("z.example.org", "pub")));
        assert_eq!(options.save_to_private_zoom, Some(TargetKey::new("z.example.org", "priv")));
        assert_eq!(options.fields, None);
        assert!(!options.raw);
    }

    #[test]
    fn test_full_config() {
        let config = ZoomSyncConfig::from_json(
            r#"{
                "targets": [
                    { "host": "a", "port": 9999, "database_name": "public", "username": "u", "password": "p" },
                    { "host": "a", "database_name": "private" }
                ],
                "types": {
                    "Topic": { "fields": ["title", "body"], "save_to_public_zoom": ["a", "public"] },
                    "Note": { "fields": ["xml"], "raw": true }
                },
                "updater": { "program": "/usr/local/bin/zupdate", "timeout_ms": 1500 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.targets.len(), 2);
        assert_eq!(config.targets[0].port, 9999);
        assert_eq!(config.targets[1].port, 210);
        assert_eq!(config.targets[1].username, "");
        assert_eq!(config.types["Topic"].fields.as_deref(), Some(&["title".to_string(), "body".to_string()][..]));
        assert!(config.types["Note"].raw);
        assert_eq!(config.updater.timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let target = IndexTargetConfig::new("h", "db").with_credentials("admin", "hunter2");
        let debug = format!("{:?}", target);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_options_builder() {
        let options = SyncOptions::default()
            .fields(["title"])
            .raw()
            .public_zoom("h", "pub")
            .private_zoom("h", "priv");

        assert_eq!(options.fields, Some(vec!["title".to_string()]));
        assert!(options.raw);
        assert_eq!(options.save_to_public_zoom.unwrap().to_string(), "h/pub");
    }
}
