//! Prometheus metrics for the store runtime and the cart backend.
//!
//! Metrics are recorded through the `metrics` facade everywhere; nothing is
//! exported unless a recorder is installed. [`install_prometheus_recorder`]
//! installs the Prometheus recorder once per process and hands back a
//! [`PrometheusHandle`] for rendering.
//!
//! # Example
//!
//! ```rust,no_run
//! use tixcart_runtime::metrics::install_prometheus_recorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let handle = install_prometheus_recorder()?;
//! println!("{}", handle.render());
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Register metric descriptions and install the Prometheus recorder.
///
/// # Errors
///
/// Returns [`MetricsError::Build`] if histogram buckets are rejected and
/// [`MetricsError::Install`] if a recorder is already installed.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, MetricsError> {
    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?;

    let handle = builder
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_metrics();
    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}

/// Register all metric descriptions.
pub fn register_metrics() {
    // Store
    describe_counter!(
        "store.commands.total",
        "Total number of actions processed by the store"
    );
    describe_counter!(
        "store.effects.executed",
        "Total number of effects executed, labelled by type"
    );
    describe_counter!(
        "store.shutdown.rejected_actions",
        "Actions rejected because the store was shutting down"
    );
    describe_histogram!(
        "store.reducer.duration_seconds",
        "Time taken to execute the reducer"
    );

    // Cart backend
    describe_counter!(
        "cart.backend.requests",
        "Requests sent to the cart backend, labelled by operation"
    );
    describe_counter!(
        "cart.backend.failures",
        "Failed cart backend requests, labelled by operation and kind"
    );
    describe_histogram!(
        "cart.backend.duration_seconds",
        "Cart backend request latency"
    );
}
