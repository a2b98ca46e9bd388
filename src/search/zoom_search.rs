// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query path: free text → PQF → Z39.50 search → domain records.
//!
//! ```text
//! find(type, request, store)
//!       │
//!       ├─→ registry: request.target → host, port, credentials
//!       ├─→ client.connect(.., XML record syntax)
//!       ├─→ QueryTranslator::translate(query, type, pqf_query)
//!       ├─→ connection.search(pqf) → ResultSet
//!       └─→ ResultMapper::map(result_set, store) → records
//! ```

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TargetKey;
use crate::metrics;
use crate::registry::SyncRegistry;
use crate::storage::traits::RecordStore;

use super::client::{ConnectionOptions, ResultSet, SearchError, ZoomClient};
use super::query_translator::QueryTranslator;
use super::result_mapper::ResultMapper;

/// What to search for and where.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchRequest {
    /// Free text: keywords and quoted phrases
    #[serde(default)]
    pub query: Option<String>,

    /// Native PQF, sent as-is. Takes precedence over `query`.
    #[serde(default)]
    pub pqf_query: Option<String>,

    /// Index instance to search
    pub target: TargetKey,
}

impl SearchRequest {
    pub fn query(target: TargetKey, query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            pqf_query: None,
            target,
        }
    }

    pub fn pqf(target: TargetKey, pqf: impl Into<String>) -> Self {
        Self {
            query: None,
            pqf_query: Some(pqf.into()),
            target,
        }
    }
}

/// Searches registered index targets on behalf of domain types.
pub struct ZoomSearch {
    registry: Arc<SyncRegistry>,
    client: Arc<dyn ZoomClient>,
}

impl ZoomSearch {
    pub fn new(registry: Arc<SyncRegistry>, client: Arc<dyn ZoomClient>) -> Self {
        Self { registry, client }
    }

    /// Run a search and return the raw result set.
    pub async fn process_query(
        &self,
        type_name: &str,
        request: &SearchRequest,
    ) -> Result<ResultSet, SearchError> {
        if request.query.is_none() && request.pqf_query.is_none() {
            return Err(SearchError::MissingQuery);
        }

        let target = self
            .registry
            .target(&request.target)
            .ok_or_else(|| SearchError::UnknownTarget(request.target.clone()))?;

        let pqf = QueryTranslator::translate(
            request.query.as_deref().unwrap_or_default(),
            type_name,
            request.pqf_query.as_deref(),
        );

        let start = Instant::now();
        let options = ConnectionOptions::for_target(target);
        let result = async {
            let mut connection = self.client.connect(&target.host, target.port, &options).await?;
            connection.search(&pqf).await
        }
        .await;
        metrics::record_search_latency(start.elapsed());

        match result {
            Ok(result_set) => {
                metrics::record_search("success");
                debug!(
                    type_name,
                    target = %request.target,
                    pqf = %pqf,
                    hits = result_set.len(),
                    "Search completed"
                );
                Ok(result_set)
            }
            Err(e) => {
                metrics::record_search("error");
                warn!(type_name, target = %request.target, error = %e, "Search failed");
                Err(e)
            }
        }
    }

    /// Search and resolve hits to records with one batch lookup.
    pub async fn find<S>(
        &self,
        type_name: &str,
        request: &SearchRequest,
        store: &S,
    ) -> Result<Vec<S::Record>, SearchError>
    where
        S: RecordStore + ?Sized,
    {
        let result_set = self.process_query(type_name, request).await?;
        Ok(ResultMapper::map(result_set, store).await?)
    }
}
