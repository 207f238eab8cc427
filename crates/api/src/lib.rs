//! HTTP API server for the seat reservation system.
//!
//! Exposes the seat count, accepts reservation requests (queued as
//! `reserve_seat` jobs) and starts the job consumer on demand, with
//! structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod observer;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use counter_store::CounterStore;
use job_queue::JobQueue;
use metrics_exporter_prometheus::PrometheusHandle;
use reservation::{ReservationGate, ReservationProcessor, SeatCounter};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use observer::spawn_job_logger;
use routes::metrics::MetricsState;
use routes::seats::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: CounterStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(MetricsState {
            handle: metrics_handle,
            queue: state.queue.clone(),
            gate: state.gate.clone(),
        });

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/available_seats", get(routes::seats::available_seats::<S>))
        .route("/reserve_seat", get(routes::seats::reserve_seat::<S>))
        .route("/process", get(routes::seats::process::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state over `store` with a closed gate and an empty
/// queue. Call [`reservation::initialize`] to seed seats and open the gate.
pub fn create_default_state<S: CounterStore + Clone + 'static>(store: S) -> Arc<AppState<S>> {
    let seats = SeatCounter::new(store);
    let gate = ReservationGate::new();
    let queue = JobQueue::new();
    let processor = ReservationProcessor::new(seats.clone(), gate.clone());

    Arc::new(AppState {
        seats,
        gate,
        queue,
        processor,
    })
}
