//! CourseHub server entry point.
//!
//! Wires configuration, the database, and the domain services together,
//! runs startup counter recovery, and keeps the periodic reconciliation
//! loop alive until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use coursehub_auth::access::AccessPolicyEngine;
use coursehub_auth::session::SessionTokenAuthority;
use coursehub_auth::signing::SignedMediaUrlIssuer;
use coursehub_core::config::AppConfig;
use coursehub_core::error::AppError;
use coursehub_database::connection::DatabasePool;
use coursehub_database::repositories::{AccountRepository, CourseRepository, EnrollmentRepository};
use coursehub_service::catalog::CatalogService;
use coursehub_service::enrollment::{CounterReconciler, EnrollmentLifecycle};
use coursehub_service::playback::PlaybackService;

#[tokio::main]
async fn main() {
    let env = std::env::var("COURSEHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
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
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting CourseHub v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    let db_pool = DatabasePool::connect(&config.database).await?;
    coursehub_database::migration::run_migrations(db_pool.pool()).await?;

    // Repositories
    let accounts = Arc::new(AccountRepository::new(db_pool.pool().clone()));
    let courses = Arc::new(CourseRepository::new(db_pool.pool().clone()));
    let enrollments = Arc::new(EnrollmentRepository::new(db_pool.pool().clone()));

    // Domain services
    let authority = SessionTokenAuthority::new(config.auth.clone(), accounts.clone());
    let policy = AccessPolicyEngine::new(courses.clone(), enrollments.clone());
    let issuer = SignedMediaUrlIssuer::from_config(&config.media)?;
    let catalog = CatalogService::new(courses.clone());
    let lifecycle = EnrollmentLifecycle::new(enrollments.clone(), courses.clone(), accounts.clone());
    let playback = PlaybackService::new(policy, issuer);
    let reconciler = CounterReconciler::new(enrollments.clone(), courses.clone(), accounts.clone());

    tracing::info!(
        ?authority,
        ?catalog,
        ?lifecycle,
        ?playback,
        "Services initialized"
    );

    // Recover counters that drifted while the server was down.
    reconciler.startup_recovery().await?;

    tracing::info!("CourseHub started");

    if config.reconciler.enabled {
        let interval = Duration::from_secs(config.reconciler.interval_seconds);
        tokio::select! {
            _ = reconcile_loop(reconciler, interval) => {}
            _ = shutdown_signal() => {}
        }
    } else {
        shutdown_signal().await;
    }

    tracing::info!("Shutting down");
    db_pool.close().await;
    Ok(())
}

/// Periodic counter reconciliation.
async fn reconcile_loop(reconciler: CounterReconciler, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.tick().await; // first tick fires immediately, startup already ran

    loop {
        ticker.tick().await;
        if let Err(e) = reconciler.reconcile().await {
            tracing::error!("Counter reconciliation failed: {e}");
        }
    }
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
