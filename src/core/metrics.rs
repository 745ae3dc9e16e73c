//! Prometheus metrics for monitoring the Copilot proxy server.
//!
//! This module provides a centralized metrics registry tracking request
//! volume, request latency, and upstream token refresh outcomes.

use prometheus::{
    register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec,
};
use std::sync::OnceLock;

/// Container for all application metrics.
pub struct Metrics {
    /// Total number of requests by method, endpoint, model, and status
    pub request_count: IntCounterVec,

    /// Request duration histogram in seconds
    pub request_duration: HistogramVec,

    /// Upstream token refresh attempts by outcome ("success" / "failure")
    pub token_refresh_count: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Initialize the metrics registry.
///
/// This should be called once at application startup. Subsequent calls will
/// return the same instance.
pub fn init_metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let request_count = register_int_counter_vec!(
            "copilot_proxy_requests_total",
            "Total number of requests",
            &["method", "endpoint", "model", "status_code"]
        )
        .expect("Failed to register request_count metric");

        let request_duration = register_histogram_vec!(
            "copilot_proxy_request_duration_seconds",
            "Request duration in seconds",
            &["method", "endpoint", "model"],
            vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]
        )
        .expect("Failed to register request_duration metric");

        let token_refresh_count = register_int_counter_vec!(
            "copilot_proxy_token_refresh_total",
            "Total number of upstream token refresh attempts",
            &["outcome"]
        )
        .expect("Failed to register token_refresh_count metric");

        Metrics {
            request_count,
            request_duration,
            token_refresh_count,
        }
    })
}

/// Get the metrics registry, initializing it on first use.
pub fn get_metrics() -> &'static Metrics {
    init_metrics()
}
