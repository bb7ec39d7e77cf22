//! Prometheus metrics for the server.
//!
//! [`ServerMetrics`] owns a dedicated [`Registry`] so a separate HTTP
//! collaborator (out of scope for this core, see §1/§6.1) can encode it
//! into the Prometheus text exposition format for a `/metrics` endpoint;
//! this crate only increments the metrics, it never serves them.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, HistogramOpts, IntCounter, IntGauge, Opts,
    Registry,
};

/// Central collection of server-level Prometheus metrics.
pub struct ServerMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    /// Total number of TCP connections accepted.
    pub connections_accepted: IntCounter,
    /// Total number of requests dispatched, regardless of outcome.
    pub requests_total: IntCounter,
    /// Total number of requests that produced a success response.
    pub requests_succeeded: IntCounter,
    /// Total number of requests that produced an error response.
    pub requests_failed: IntCounter,

    /// Current number of connection workers in flight.
    pub active_workers: IntGauge,

    /// Wall-clock duration of a connection's request/response cycle, in ms.
    pub connection_duration_ms: Histogram,
}

impl ServerMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let connections_accepted = register_int_counter_with_registry!(
            Opts::new("procd_connections_accepted_total", "Total TCP connections accepted"),
            registry
        )
        .expect("failed to register connections_accepted counter");

        let requests_total = register_int_counter_with_registry!(
            Opts::new("procd_requests_total", "Total requests dispatched"),
            registry
        )
        .expect("failed to register requests_total counter");

        let requests_succeeded = register_int_counter_with_registry!(
            Opts::new("procd_requests_succeeded_total", "Total requests that succeeded"),
            registry
        )
        .expect("failed to register requests_succeeded counter");

        let requests_failed = register_int_counter_with_registry!(
            Opts::new("procd_requests_failed_total", "Total requests that returned an error"),
            registry
        )
        .expect("failed to register requests_failed counter");

        let active_workers = register_int_gauge_with_registry!(
            Opts::new("procd_active_workers", "Current number of in-flight connection workers"),
            registry
        )
        .expect("failed to register active_workers gauge");

        let connection_duration_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "procd_connection_duration_ms",
                "Connection request/response cycle duration in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(0.1, 2.0, 15).unwrap()),
            registry
        )
        .expect("failed to register connection_duration_ms histogram");

        Self {
            registry,
            connections_accepted,
            requests_total,
            requests_succeeded,
            requests_failed,
            active_workers,
            connection_duration_ms,
        }
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_can_be_incremented_independently() {
        let metrics = ServerMetrics::new();
        metrics.connections_accepted.inc();
        metrics.requests_total.inc();
        metrics.requests_succeeded.inc();
        metrics.active_workers.set(3);
        assert_eq!(metrics.connections_accepted.get(), 1);
        assert_eq!(metrics.requests_total.get(), 1);
        assert_eq!(metrics.requests_succeeded.get(), 1);
        assert_eq!(metrics.requests_failed.get(), 0);
        assert_eq!(metrics.active_workers.get(), 3);
    }
}
