//! Seat count, reservation and queue-processing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use common::RESERVE_SEAT_JOB;
use counter_store::CounterStore;
use job_queue::JobQueue;
use reservation::{ReservationGate, ReservationProcessor, SeatCounter};
use serde::Serialize;

use crate::error::ApiError;

pub const STATUS_BLOCKED: &str = "Reservation are blocked";
pub const STATUS_IN_PROCESS: &str = "Reservation in process";
pub const STATUS_FAILED: &str = "Reservation failed";
pub const STATUS_QUEUE_PROCESSING: &str = "Queue processing";

/// Shared application state accessible from all handlers.
pub struct AppState<S: CounterStore> {
    pub seats: SeatCounter<S>,
    pub gate: ReservationGate,
    pub queue: JobQueue,
    pub processor: ReservationProcessor<S>,
}

// -- Response types --

#[derive(Serialize)]
pub struct AvailableSeatsResponse {
    #[serde(rename = "numberOfAvailableSeats")]
    pub number_of_available_seats: u64,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

// -- Handlers --

/// GET /available_seats — current number of available seats.
#[tracing::instrument(skip(state))]
pub async fn available_seats<S: CounterStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<AvailableSeatsResponse>, ApiError> {
    let seats = state.seats.read_seats().await?;
    Ok(Json(AvailableSeatsResponse {
        number_of_available_seats: seats,
    }))
}

/// GET /reserve_seat — enqueue a reservation job if the gate is open.
///
/// Always answers 200; the outcome of the job itself is only logged.
#[tracing::instrument(skip(state))]
pub async fn reserve_seat<S: CounterStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<StatusResponse> {
    if !state.gate.is_open() {
        metrics::counter!("reservation_requests_total", "outcome" => "blocked").increment(1);
        return Json(StatusResponse {
            status: STATUS_BLOCKED,
        });
    }

    match state.queue.enqueue(RESERVE_SEAT_JOB).await {
        Ok(job_id) => {
            metrics::counter!("reservation_requests_total", "outcome" => "queued").increment(1);
            tracing::info!(%job_id, "seat reservation job queued");
            Json(StatusResponse {
                status: STATUS_IN_PROCESS,
            })
        }
        Err(e) => {
            metrics::counter!("reservation_requests_total", "outcome" => "failed").increment(1);
            tracing::error!(error = %e, "failed to enqueue seat reservation job");
            Json(StatusResponse {
                status: STATUS_FAILED,
            })
        }
    }
}

/// GET /process — start consuming reservation jobs.
///
/// Responds right away; the consumer is registered in the background.
#[tracing::instrument(skip(state))]
pub async fn process<S: CounterStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<StatusResponse> {
    tokio::spawn(async move {
        let processor = Arc::new(state.processor.clone());
        if let Err(e) = state.queue.process(RESERVE_SEAT_JOB, processor).await {
            tracing::warn!(error = %e, "reservation consumer not registered");
        }
    });

    Json(StatusResponse {
        status: STATUS_QUEUE_PROCESSING,
    })
}
