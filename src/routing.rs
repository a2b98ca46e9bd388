// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Public/private index routing.
//!
//! ```text
//! public target configured?  ──→ candidate = public
//! private target configured
//!   and record.is_private()  ──→ candidate = private
//! candidate ──→ registry lookup by (host, database_name) ──→ IndexTargetConfig
//! ```
//!
//! A miss is an error. Falling back to another host would put a record in
//! the wrong partition.

use thiserror::Error;

use crate::config::{IndexTargetConfig, TargetKey};
use crate::record::IndexedRecord;
use crate::registry::{SyncConfiguration, SyncRegistry};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("type '{type_name}' has no index target for this record")]
    NoTarget { type_name: String },
    #[error("index target {0} is not registered")]
    UnknownTarget(TargetKey),
}

pub struct DatabaseRouter;

impl DatabaseRouter {
    /// The target key a record should be written to, before credential lookup.
    pub fn candidate<'c, R: IndexedRecord + ?Sized>(
        record: &R,
        config: &'c SyncConfiguration,
    ) -> Option<&'c TargetKey> {
        // Visibility is only consulted when there is a private index to route to.
        if let Some(private) = &config.private_target {
            if record.is_private() {
                return Some(private);
            }
        }
        config.public_target.as_ref()
    }

    pub fn resolve<'r, R: IndexedRecord + ?Sized>(
        registry: &'r SyncRegistry,
        record: &R,
        config: &SyncConfiguration,
    ) -> Result<&'r IndexTargetConfig, RoutingError> {
        let key = Self::candidate(record, config).ok_or_else(|| RoutingError::NoTarget {
            type_name: config.type_name.clone(),
        })?;

        registry
            .target(key)
            .ok_or_else(|| RoutingError::UnknownTarget(key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SyncOptions;
    use crate::record::{FieldAccessor, RecordId};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Topic {
        private: bool,
        asked: AtomicBool,
    }

    impl Topic {
        fn new(private: bool) -> Self {
            Self { private, asked: AtomicBool::new(false) }
        }
    }

    impl FieldAccessor for Topic {
        fn stored_attribute(&self, _name: &str) -> Option<String> {
            None
        }
    }

    impl IndexedRecord for Topic {
        fn type_name(&self) -> &str {
            "Topic"
        }

        fn primary_key(&self) -> RecordId {
            1
        }

        fn attributes(&self) -> Vec<(String, String)> {
            Vec::new()
        }

        fn is_private(&self) -> bool {
            self.asked.store(true, Ordering::SeqCst);
            self.private
        }
    }

    fn registry() -> SyncRegistry {
        let mut builder = SyncRegistry::builder();
        builder
            .add_target(IndexTargetConfig::new("h", "public").with_credentials("pub-user", "x"))
            .unwrap()
            .add_target(IndexTargetConfig::new("h", "private").with_credentials("priv-user", "y"))
            .unwrap();
        builder.build()
    }

    fn config(options: SyncOptions) -> SyncConfiguration {
        SyncConfiguration::from_options("Topic", options).unwrap()
    }

    #[test]
    fn test_private_record_goes_to_private_target() {
        let registry = registry();
        let config = config(SyncOptions::default().public_zoom("h", "public").private_zoom("h", "private"));

        let target = DatabaseRouter::resolve(&registry, &Topic::new(true), &config).unwrap();
        assert_eq!(target.database_name, "private");
        assert_eq!(target.username, "priv-user");

        let target = DatabaseRouter::resolve(&registry, &Topic::new(false), &config).unwrap();
        assert_eq!(target.database_name, "public");
    }

    #[test]
    fn test_public_only_ignores_privacy() {
        let registry = registry();
        let config = config(SyncOptions::default().public_zoom("h", "public"));

        let topic = Topic::new(true);
        let target = DatabaseRouter::resolve(&registry, &topic, &config).unwrap();
        assert_eq!(target.database_name, "public");
        assert!(!topic.asked.load(Ordering::SeqCst));
    }

    #[test]
    fn test_private_only_public_record_has_no_target() {
        let registry = registry();
        let config = config(SyncOptions::default().private_zoom("h", "private"));

        assert_eq!(
            DatabaseRouter::resolve(&registry, &Topic::new(false), &config).unwrap_err(),
            RoutingError::NoTarget { type_name: "Topic".into() }
        );
        assert!(DatabaseRouter::resolve(&registry, &Topic::new(true), &config).is_ok());
    }

    #[test]
    fn test_unregistered_target_is_an_error() {
        let registry = registry();
        let config = config(SyncOptions::default().public_zoom("elsewhere", "public"));

        assert_eq!(
            DatabaseRouter::resolve(&registry, &Topic::new(false), &config).unwrap_err(),
            RoutingError::UnknownTarget(TargetKey::new("elsewhere", "public"))
        );
    }

    #[test]
    fn test_no_targets_configured() {
        let registry = registry();
        let config = config(SyncOptions::default());

        assert!(matches!(
            DatabaseRouter::resolve(&registry, &Topic::new(false), &config),
            Err(RoutingError::NoTarget { .. })
        ));
    }
}
