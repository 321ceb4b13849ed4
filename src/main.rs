//! Pulse Server — Notification Dispatch Hub
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use pulse_core::config::AppConfig;
use pulse_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("PULSE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Pulse v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = pulse_database::DatabasePool::connect(&config.database).await?;

    db.run_migrations().await?;

    let store: Arc<dyn pulse_database::NotificationStore> = Arc::new(
        pulse_database::PgNotificationStore::new(db.pool().clone()),
    );

    // ── Step 2: Channel senders ──────────────────────────────────
    let directory = Arc::new(pulse_channels::StaticDirectory::new());
    let registry = Arc::new(
        pulse_channels::ChannelRegistry::new()
            .register(Arc::new(pulse_channels::InAppSender::new()))
            .register(Arc::new(pulse_channels::PushSender::new(
                config.channels.push.clone(),
            )))
            .register(Arc::new(pulse_channels::SmsSender::new(
                config.channels.sms.clone(),
                Arc::clone(&directory) as _,
            )))
            .register(Arc::new(pulse_channels::EmailSender::new())),
    );

    // ── Step 3: Feed, engine, retention ──────────────────────────
    let feed = Arc::new(pulse_realtime::NotificationFeed::new(
        config.realtime.feed_buffer_size,
    ));
    let engine = Arc::new(pulse_dispatch::DispatchEngine::new(
        Arc::clone(&store),
        Arc::clone(&registry),
        Arc::clone(&feed),
    ));
    let retention = Arc::new(pulse_dispatch::ReadRetentionManager::new(Arc::clone(
        &store,
    )));

    // ── Step 4: Background worker ────────────────────────────────
    let scheduler = if config.worker.enabled {
        tracing::info!("Starting background worker...");
        let scheduler = pulse_worker::CronScheduler::new(
            config.worker.clone(),
            Arc::clone(&store),
            Arc::clone(&engine),
        )
        .await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
        tracing::info!("Background worker started");
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 5: Build and start HTTP server ──────────────────────
    tracing::info!(
        "Starting HTTP server on {}:{}...",
        config.server.host,
        config.server.port
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app_state = pulse_api::AppState {
        config: Arc::new(config),
        store,
        feed,
        engine,
        retention,
    };

    let app = pulse_api::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Pulse server listening on {}", addr);

    // ── Step 6: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    db.close().await;

    tracing::info!("Pulse server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
