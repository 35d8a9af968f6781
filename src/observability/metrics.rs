//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_auth_rejections_total` (counter): rejected credentials by reason
//! - `api_payload_rejections_total` (counter): rejected bodies by reason
//! - `api_logins_total` (counter): login attempts by outcome
//! - `api_shutdown_drain_seconds` (histogram): drain duration by resolution path
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_auth_rejection(reason: &'static str) {
    counter!("api_auth_rejections_total", "reason" => reason).increment(1);
}

pub fn record_payload_rejection(reason: &'static str) {
    counter!("api_payload_rejections_total", "reason" => reason).increment(1);
}

pub fn record_login(outcome: &'static str) {
    counter!("api_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_drain(path: &'static str, elapsed: Duration) {
    histogram!("api_shutdown_drain_seconds", "path" => path).record(elapsed.as_secs_f64());
}
