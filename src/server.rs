//! HTTP server initialization and runtime setup.
//!
//! Handles broker connection, publisher pool spawning, Axum server lifecycle
//! and graceful shutdown.

use crate::application::dispatcher::PublishDispatcher;
use crate::config::{BrokerMode, Config};
use crate::domain::publish_stats::PublishStats;
use crate::domain::publish_worker::run_publish_workers;
use crate::infrastructure::broker::{AmqpSink, BrokerSink, MemorySink};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Builds the broker sink selected by `BROKER_MODE`.
///
/// # Errors
///
/// Returns an error if the AMQP connection, channel or queue declaration fails.
pub async fn connect_sink(config: &Config) -> Result<Arc<dyn BrokerSink>> {
    match config.broker_mode {
        BrokerMode::Amqp => {
            let sink = AmqpSink::connect(&config.broker_settings())
                .await
                .context("Failed to connect to message broker")?;
            tracing::info!("Connected to broker, queue '{}'", sink.queue_name());
            Ok(Arc::new(sink))
        }
        BrokerMode::Memory => {
            tracing::warn!("Broker disabled (MemorySink), payloads are kept in memory only");
            Ok(Arc::new(MemorySink::new(config.queue_name.clone())))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Broker sink (connection, channel, queue)
/// - Bounded publish queue and publisher pool
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, the publish
/// queue is drained and the broker connection is closed.
///
/// # Errors
///
/// Returns an error if:
/// - Broker connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let router_options = config.router_options()?;
    let sink = connect_sink(&config).await?;

    let stats = Arc::new(PublishStats::default());
    let (dispatcher, publish_rx) =
        PublishDispatcher::new(config.publish_queue_capacity, stats.clone());

    let workers = tokio::spawn(run_publish_workers(
        publish_rx,
        sink.clone(),
        stats,
        config.worker_settings(),
    ));
    tracing::info!(
        "Publish workers started ({} tasks)",
        config.publisher_concurrency
    );

    let state = AppState::new(dispatcher, sink.clone());

    let app = app_router(state, router_options);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router, and with it every dispatcher sender, is gone at this point.
    tracing::info!("Draining publish queue");
    if let Err(e) = workers.await {
        tracing::error!(error = %e, "Publish worker pool failed");
    }

    sink.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM");
        },
    }
}
