//! Prometheus metrics endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use job_queue::JobQueue;
use metrics_exporter_prometheus::PrometheusHandle;
use reservation::ReservationGate;

/// State for the metrics route: the exporter handle plus the live values
/// sampled on each scrape.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub queue: JobQueue,
    pub gate: ReservationGate,
}

/// GET /metrics — returns Prometheus-formatted metrics.
pub async fn get(State(state): State<MetricsState>) -> impl IntoResponse {
    let stats = state.queue.stats().await;
    metrics::gauge!("jobs_queued").set(stats.queued as f64);
    metrics::gauge!("jobs_active").set(stats.active as f64);
    metrics::gauge!("reservation_gate_open").set(if state.gate.is_open() { 1.0 } else { 0.0 });

    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.handle.render(),
    )
}
