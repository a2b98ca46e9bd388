// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Z39.50 client seam.
//!
//! The session protocol lives in an external client library; this crate only
//! needs to connect, run a PQF search and read XML hit payloads back.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{IndexTargetConfig, TargetKey};
use crate::storage::traits::StorageError;

/// Record syntax requested for every connection.
pub const XML_RECORD_SYNTAX: &str = "XML";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to connect to {host}:{port}: {reason}")]
    Connection { host: String, port: u16, reason: String },
    #[error("Search failed: {0}")]
    Search(String),
    #[error("index target {0} is not registered")]
    UnknownTarget(TargetKey),
    #[error("search request has neither a query nor a PQF query")]
    MissingQuery,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Session options sent on connect.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub user: String,
    pub password: String,
    pub database_name: String,
    pub preferred_record_syntax: String,
}

impl ConnectionOptions {
    pub fn for_target(target: &IndexTargetConfig) -> Self {
        Self {
            user: target.username.clone(),
            password: target.password.clone(),
            database_name: target.database_name.clone(),
            preferred_record_syntax: XML_RECORD_SYNTAX.to_string(),
        }
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database_name", &self.database_name)
            .field("preferred_record_syntax", &self.preferred_record_syntax)
            .finish()
    }
}

/// One search hit: a serialized field-record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    xml: String,
}

impl SearchHit {
    pub fn new(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    #[must_use]
    pub fn xml(&self) -> &str {
        &self.xml
    }
}

/// Hits returned by one search. Consumed once, never cached.
#[derive(Debug, Default)]
pub struct ResultSet {
    hits: Vec<SearchHit>,
}

impl ResultSet {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self { hits }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl IntoIterator for ResultSet {
    type Item = SearchHit;
    type IntoIter = std::vec::IntoIter<SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl FromIterator<SearchHit> for ResultSet {
    fn from_iter<I: IntoIterator<Item = SearchHit>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Opens sessions against a Z39.50 server.
#[async_trait]
pub trait ZoomClient: Send + Sync {
    async fn connect(
        &self,
        host: &str,
        port: u16,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn ZoomConnection>, SearchError>;
}

/// An open session.
#[async_trait]
pub trait ZoomConnection: Send {
    async fn search(&mut self, pqf: &str) -> Result<ResultSet, SearchError>;
}
