//! Metric recording helpers.
//!
//! Thin wrappers over the `metrics` facade so call sites stay one line and
//! metric names/labels live in a single place. Exported via the Prometheus
//! listener when telemetry is enabled.

use std::time::Duration;

use metrics::{counter, histogram};

use crate::types::ChainId;

pub(crate) fn record_tx_stage(
    chain_id: ChainId,
    operation: &str,
    stage: &str,
    status: &str,
    duration: Duration,
) {
    counter!(
        "ret_client_tx_stage_total",
        "chain_id" => chain_id.to_string(),
        "operation" => operation.to_string(),
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "ret_client_tx_stage_duration_seconds",
        "chain_id" => chain_id.to_string(),
        "operation" => operation.to_string(),
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub(crate) fn record_backend_call(endpoint: &str, status: &str, duration: Duration) {
    counter!(
        "ret_client_backend_requests_total",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "ret_client_backend_request_duration_seconds",
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub(crate) fn record_wallet_event(kind: &str) {
    counter!(
        "ret_client_wallet_events_total",
        "kind" => kind.to_string()
    )
    .increment(1);
}
