// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for search-index.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host application is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `search_index_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `command`: SEARCH.CREATE, SEARCH.QUERY, ...
//! - `status`: success, error

use metrics::{counter, histogram};
use std::time::{Duration, Instant};

/// Record a finished command
pub fn record_command(command: &str, success: bool) {
    let status = if success { "success" } else { "error" };
    counter!(
        "search_index_commands_total",
        "command" => command.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record command round-trip latency
pub fn record_latency(command: &str, duration: Duration) {
    histogram!(
        "search_index_command_seconds",
        "command" => command.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record the number of hits returned by a query
pub fn record_query_results(count: usize) {
    histogram!("search_index_query_results").record(count as f64);
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    command: String,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(&self.command, self.start.elapsed());
    }
}
