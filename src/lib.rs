// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Zoom Sync
//!
//! Keeps a relational record store and a Z39.50 search index (Zebra, Voyager,
//! ...) consistent, and turns free-text queries into type-scoped PQF.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Write Path                          │
//! │  storage commit ──→ IndexSyncDispatcher::on_save/on_destroy │
//! │    • RecordSerializer: record → FieldRecord (XML)           │
//! │    • DatabaseRouter: public / private index target          │
//! │    • IndexUpdater: specialUpdate / recordDelete             │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Query Path                          │
//! │  free text ──→ QueryTranslator ──→ PQF                      │
//! │    • ZoomClient: connect + search (XML record syntax)       │
//! │    • ResultMapper: hits → primary keys → one batch lookup   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both paths read a [`SyncRegistry`] built once at startup: index targets
//! keyed by `(host, database_name)` and per-type [`SyncOptions`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zoom_sync::{
//!     FieldAccessor, IndexSyncDispatcher, IndexTargetConfig, IndexedRecord, ProcessUpdater,
//!     RecordId, SyncOptions, SyncRegistry,
//! };
//!
//! struct Book { id: RecordId, title: String }
//!
//! impl FieldAccessor for Book {
//!     fn stored_attribute(&self, name: &str) -> Option<String> {
//!         (name == "title").then(|| self.title.clone())
//!     }
//! }
//!
//! impl IndexedRecord for Book {
//!     fn type_name(&self) -> &str { "Book" }
//!     fn primary_key(&self) -> RecordId { self.id }
//!     fn attributes(&self) -> Vec<(String, String)> {
//!         vec![("id".into(), self.id.to_string()), ("title".into(), self.title.clone())]
//!     }
//!     fn is_private(&self) -> bool { false }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut builder = SyncRegistry::builder();
//! builder.add_target(IndexTargetConfig::new("localhost", "books").with_credentials("admin", "secret")).unwrap();
//! builder.register_type("Book", SyncOptions::default().fields(["title"]).public_zoom("localhost", "books")).unwrap();
//!
//! let dispatcher = IndexSyncDispatcher::new(
//!     Arc::new(builder.build()),
//!     Arc::new(ProcessUpdater::new("./zoom_ext_services_action.pl")),
//! );
//!
//! let book = Book { id: 1, title: "Dune".into() };
//! if let Err(e) = dispatcher.on_save(&book).await {
//!     eprintln!("index is behind: {e}");
//! }
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`record`]: record traits, identity and field-record serialization
//! - [`registry`]: read-only target and per-type configuration registry
//! - [`routing`]: public/private index routing
//! - [`dispatcher`]: save/destroy/rebuild synchronization
//! - [`updater`]: the index update boundary and its process implementation
//! - [`search`]: PQF translation, the Z39.50 client seam and result mapping
//! - [`storage`]: the record store seam

pub mod config;
pub mod record;
pub mod registry;
pub mod routing;
pub mod updater;
pub mod storage;
pub mod search;
pub mod dispatcher;
pub mod metrics;

// Note: We don't expose a `tracing` module to avoid conflict with the tracing crate

pub use config::{IndexTargetConfig, SyncOptions, TargetKey, UpdaterConfig, ZoomSyncConfig};
pub use record::{
    FieldAccessor, FieldError, FieldRecord, IndexIdentity, IndexedRecord, PayloadError, RecordId,
    RecordSerializer, IDENTITY_FIELD,
};
pub use registry::{ConfigError, SyncConfiguration, SyncRegistry, SyncRegistryBuilder};
pub use routing::{DatabaseRouter, RoutingError};
pub use updater::{IndexCallError, IndexUpdater, ProcessUpdater, UpdateOperation, UpdateRequest};
pub use storage::traits::{RecordStore, StorageError};
pub use storage::memory::InMemoryRecordStore;
pub use search::{
    QueryTranslator, ResultMapper, ResultSet, SearchError, SearchHit, SearchRequest, ZoomClient,
    ZoomConnection, ZoomSearch,
};
pub use dispatcher::{IndexSyncDispatcher, RebuildReport, SyncError, UpdateReport};
