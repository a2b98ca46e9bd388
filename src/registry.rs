// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Read-only registry of index targets and per-type sync configuration.
//!
//! Built once at startup and shared behind an `Arc`; nothing in it changes
//! afterwards, so lookups take no locks.
//!
//! # Example
//!
//! ```
//! use zoom_sync::{IndexTargetConfig, SyncOptions, SyncRegistry, TargetKey};
//!
//! let mut builder = SyncRegistry::builder();
//! builder.add_target(IndexTargetConfig::new("zebra.local", "public")).unwrap();
//! builder.add_target(IndexTargetConfig::new("zebra.local", "private")).unwrap();
//! builder
//!     .register_type(
//!         "Topic",
//!         SyncOptions::default()
//!             .fields(["title", "description"])
//!             .public_zoom("zebra.local", "public")
//!             .private_zoom("zebra.local", "private"),
//!     )
//!     .unwrap();
//! let registry = builder.build();
//!
//! assert!(registry.configuration("Topic").is_some());
//! assert!(registry.target(&TargetKey::new("zebra.local", "public")).is_some());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{IndexTargetConfig, SyncOptions, TargetKey, ZoomSyncConfig};
use crate::record::is_xml_name;

/// Rejected registration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("type '{0}' is already registered")]
    DuplicateType(String),
    #[error("index target {0} is already registered")]
    DuplicateTarget(TargetKey),
    #[error("type '{type_name}' uses raw mode but configures no field")]
    RawWithoutField { type_name: String },
    #[error("type '{type_name}' configures field '{field}', which is not a valid XML element name")]
    InvalidFieldName { type_name: String, field: String },
}

/// Immutable sync configuration of one domain type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfiguration {
    pub type_name: String,
    /// `None` indexes every attribute
    pub fields: Option<Vec<String>>,
    pub raw: bool,
    pub public_target: Option<TargetKey>,
    pub private_target: Option<TargetKey>,
}

impl SyncConfiguration {
    /// Validate registration options for `type_name`.
    pub fn from_options(type_name: impl Into<String>, options: SyncOptions) -> Result<Self, ConfigError> {
        let type_name = type_name.into();

        if let Some(fields) = &options.fields {
            if let Some(bad) = fields.iter().find(|f| !is_xml_name(f)) {
                return Err(ConfigError::InvalidFieldName {
                    type_name,
                    field: bad.clone(),
                });
            }
        }

        let has_field = options.fields.as_ref().is_some_and(|f| !f.is_empty());
        if options.raw && !has_field {
            return Err(ConfigError::RawWithoutField { type_name });
        }

        Ok(Self {
            type_name,
            fields: options.fields,
            raw: options.raw,
            public_target: options.save_to_public_zoom,
            private_target: options.save_to_private_zoom,
        })
    }

    fn target_keys(&self) -> impl Iterator<Item = &TargetKey> {
        self.public_target.iter().chain(self.private_target.iter())
    }
}

/// Index targets keyed by `(host, database_name)` and configurations keyed by type name.
#[derive(Debug, Default)]
pub struct SyncRegistry {
    targets: HashMap<TargetKey, IndexTargetConfig>,
    types: HashMap<String, Arc<SyncConfiguration>>,
}

impl SyncRegistry {
    #[must_use]
    pub fn builder() -> SyncRegistryBuilder {
        SyncRegistryBuilder::default()
    }

    /// Build a registry from a loaded [`ZoomSyncConfig`].
    pub fn from_config(config: &ZoomSyncConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        for target in &config.targets {
            builder.add_target(target.clone())?;
        }
        for (type_name, options) in &config.types {
            builder.register_type(type_name.clone(), options.clone())?;
        }
        Ok(builder.build())
    }

    pub fn configuration(&self, type_name: &str) -> Option<Arc<SyncConfiguration>> {
        self.types.get(type_name).cloned()
    }

    /// Exact `(host, database_name)` lookup; never falls back to another target.
    pub fn target(&self, key: &TargetKey) -> Option<&IndexTargetConfig> {
        self.targets.get(key)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

/// Collects targets and type registrations, then freezes them into a [`SyncRegistry`].
#[derive(Debug, Default)]
pub struct SyncRegistryBuilder {
    targets: HashMap<TargetKey, IndexTargetConfig>,
    types: HashMap<String, Arc<SyncConfiguration>>,
}

impl SyncRegistryBuilder {
    pub fn add_target(&mut self, target: IndexTargetConfig) -> Result<&mut Self, ConfigError> {
        let key = target.key();
        if self.targets.contains_key(&key) {
            return Err(ConfigError::DuplicateTarget(key));
        }
        self.targets.insert(key, target);
        Ok(self)
    }

    pub fn register_type(
        &mut self,
        type_name: impl Into<String>,
        options: SyncOptions,
    ) -> Result<&mut Self, ConfigError> {
        let type_name = type_name.into();
        if self.types.contains_key(&type_name) {
            return Err(ConfigError::DuplicateType(type_name));
        }
        let config = SyncConfiguration::from_options(type_name.clone(), options)?;
        debug!(type_name = %type_name, raw = config.raw, "Registered type for index sync");
        self.types.insert(type_name, Arc::new(config));
        Ok(self)
    }

    #[must_use]
    pub fn build(self) -> SyncRegistry {
        for config in self.types.values() {
            if config.public_target.is_none() && config.private_target.is_none() {
                warn!(type_name = %config.type_name, "Type has no index target, its records will not be indexed");
            }
            for key in config.target_keys() {
                if !self.targets.contains_key(key) {
                    warn!(type_name = %config.type_name, target = %key, "Type routes to an unregistered index target");
                }
            }
        }

        SyncRegistry {
            targets: self.targets,
            types: self.types,
        }
    }
}
