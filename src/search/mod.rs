// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Infrastructure
//!
//! Free-text search against a Z39.50 index, resolved back to domain records.
//!
//! # Architecture
//!
//! ```text
//! QueryTranslator (free text → PQF)
//!     ↓
//! ZoomClient / ZoomConnection (external Z39.50 session)
//!     ↓
//! ResultMapper (XML hits → primary keys → one batch lookup)
//! ```
//!
//! # Query Language (PQF)
//!
//! ```text
//! @and @attr 1=12 Book @attr 2=102 @attr 5=3 dune "frank herbert"
//!  │         │          │           └─ truncate left and right
//!  │         │          └─ relevance ranking
//!  │         └─ scope to the Book type
//!  └─ both the scope and the terms must match
//! ```

mod client;
mod query_translator;
mod result_mapper;
mod zoom_search;

pub use client::{
    ConnectionOptions, ResultSet, SearchError, SearchHit, ZoomClient, ZoomConnection,
    XML_RECORD_SYNTAX,
};
pub use query_translator::{
    QueryTranslator, RELEVANCE_ATTRIBUTE, TRUNCATION_ATTRIBUTE, TYPE_SCOPE_ATTRIBUTE,
};
pub use result_mapper::ResultMapper;
pub use zoom_search::{SearchRequest, ZoomSearch};
