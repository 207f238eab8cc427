//! API server entry point.

use api::config::Config;
use counter_store::{CounterStore, InMemoryCounterStore, PostgresCounterStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<S: CounterStore + Clone + 'static>(
    store: S,
    config: Config,
    metrics_handle: PrometheusHandle,
) {
    let state = api::create_default_state(store);
    let _job_logger = api::spawn_job_logger(state.queue.observe().await);
    let app = api::create_app(state.clone(), metrics_handle);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    tracing::info!(%addr, "API available");

    // Seats are seeded only once the listener is bound; the gate stays
    // closed if this fails.
    if let Err(e) =
        reservation::initialize(&state.seats, &state.gate, config.initial_seats).await
    {
        tracing::error!(error = %e, "error setting initial seats");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    state.queue.close().await;
    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Pick the counter store and serve
    match config.database_url.clone() {
        Some(url) => {
            let store = PostgresCounterStore::connect_lazy(&url)
                .expect("invalid DATABASE_URL");
            match store.run_migrations().await {
                Ok(()) => tracing::info!("counter store connected"),
                Err(e) => tracing::error!(error = %e, "counter store not connected"),
            }
            serve(store, config, metrics_handle).await;
        }
        None => {
            tracing::info!("using in-memory counter store");
            serve(InMemoryCounterStore::new(), config, metrics_handle).await;
        }
    }
}
