//! Tracing and metrics bootstrap for embedding applications.
//!
//! This crate is a library and never installs anything on its own; a host
//! that wants the client's logging calls [`initialize`] once at startup.
//! Output is pretty (human-readable) or JSON, with the level filter taken
//! from the config unless `RUST_LOG` overrides it. A Prometheus exporter
//! can be enabled alongside.

mod config;

use std::net::SocketAddr;

pub use config::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber and, if enabled, the Prometheus
/// metrics exporter.
///
/// The `RUST_LOG` environment variable overrides the configured level. A
/// host that already installed its own subscriber keeps it: the client's
/// spans and events flow into the existing one and the skipped install is
/// logged as a warning.
pub fn initialize(logger_config: &LoggerConfig, telemetry_config: &TelemetryConfig) {
    install_subscriber(logger_config);
    install_metrics_exporter(&telemetry_config.metrics);
}

fn install_subscriber(logger_config: &LoggerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logger_config.level));

    let format_layer = match logger_config.format {
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        LogFormat::Json => fmt::layer().json().boxed(),
    };

    if let Err(error) = tracing_subscriber::registry()
        .with(filter)
        .with(format_layer)
        .try_init()
    {
        tracing::warn!(
            error = %error,
            "A global tracing subscriber is already installed; keeping it"
        );
    }
}

fn install_metrics_exporter(metrics_config: &TelemetryMetricsConfig) {
    if !metrics_config.enabled {
        return;
    }

    let bind_address: SocketAddr = match metrics_config.bind_address.parse() {
        Ok(address) => address,
        Err(error) => {
            tracing::warn!(
                bind_address = %metrics_config.bind_address,
                error = %error,
                "Invalid metrics bind address; exporter not started"
            );
            return;
        }
    };

    if let Err(error) = PrometheusBuilder::new()
        .with_http_listener(bind_address)
        .install()
    {
        tracing::warn!(
            bind_address = %bind_address,
            error = %error,
            "Prometheus metrics exporter failed to start"
        );
        return;
    }

    tracing::info!(bind_address = %bind_address, "Prometheus metrics exporter listening");
}
