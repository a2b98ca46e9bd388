// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for zoom-sync.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `zoom_sync_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: specialUpdate, recordDelete
//! - `status`: success, error, skipped
//! - `type_name`: domain type

use metrics::{counter, histogram};
use std::time::Duration;

/// Record the outcome of an index update call
pub fn record_index_call(operation: &str, status: &str) {
    counter!(
        "zoom_sync_index_calls_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record index update latency
pub fn record_index_latency(operation: &str, duration: Duration) {
    histogram!(
        "zoom_sync_index_call_seconds",
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record a field that could not be resolved during serialization
pub fn record_field_failure(type_name: &str) {
    counter!(
        "zoom_sync_field_resolution_failures_total",
        "type_name" => type_name.to_string()
    )
    .increment(1);
}

/// Record a search hit skipped because its payload was malformed
pub fn record_malformed_hit() {
    counter!("zoom_sync_malformed_hits_total").increment(1);
}

/// Record a search outcome
pub fn record_search(status: &str) {
    counter!(
        "zoom_sync_searches_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record search latency (connect + search)
pub fn record_search_latency(duration: Duration) {
    histogram!("zoom_sync_search_seconds").record(duration.as_secs_f64());
}

/// Record a finished index rebuild
pub fn record_rebuild(type_name: &str, succeeded: usize, failed: usize) {
    counter!(
        "zoom_sync_rebuilds_total",
        "type_name" => type_name.to_string()
    )
    .increment(1);
    counter!(
        "zoom_sync_rebuilt_records_total",
        "type_name" => type_name.to_string(),
        "status" => "success"
    )
    .increment(succeeded as u64);
    counter!(
        "zoom_sync_rebuilt_records_total",
        "type_name" => type_name.to_string(),
        "status" => "error"
    )
    .increment(failed as u64);
}
