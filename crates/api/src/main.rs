//! Otelier API server.
//!
//! Serves the hotel booking REST API. Configuration comes entirely from the
//! environment (see [`otelier_api::config`]).
//!
//! # Storage
//!
//! `OTELIER_STORAGE=postgres` (default) connects to `OTELIER_DATABASE_URL`.
//! Migrations are NOT run on startup; run them with `otelier migrate`.
//! `OTELIER_STORAGE=memory` keeps everything in process, for local use.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use secrecy::ExposeSecret;
use sentry::integrations::tracing as sentry_tracing;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use otelier_api::clock::Clock;
use otelier_api::config::{ApiConfig, ConfigError, StorageConfig};
use otelier_api::db::{self, MemoryStore, Repositories};
use otelier_api::services::{EmailService, NotificationDispatcher, Notifier};
use otelier_api::slack::SlackWebhook;
use otelier_api::state::AppState;

/// Time allowed for queued notifications after the server stops.
const NOTIFICATION_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that abort startup or serving.
#[derive(Debug, Error)]
enum ServerError {
    #[error("Failed to install rustls crypto provider")]
    CryptoProvider,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Slack error: {0}")]
    Slack(#[from] otelier_api::slack::SlackError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            // Guest names and emails stay out of error reports
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(json_logs: bool) {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "otelier_api=info,tower_http=debug".into());

    let json_layer = json_logs.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json_logs).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

async fn open_storage(config: &StorageConfig) -> Result<Repositories, ServerError> {
    match config {
        StorageConfig::Postgres { database_url } => {
            let pool = db::create_pool(database_url).await?;
            tracing::info!("Database pool created");
            Ok(Repositories::postgres(pool))
        }
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Repositories::memory(&MemoryStore::new()))
        }
    }
}

fn build_notifiers(config: &ApiConfig) -> Result<Vec<Arc<dyn Notifier>>, ServerError> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();

    if let Some(slack) = &config.slack {
        notifiers.push(Arc::new(SlackWebhook::new(slack)?));
        tracing::info!("Slack notifications enabled");
    }
    if let Some(email) = &config.email {
        notifiers.push(Arc::new(EmailService::new(email)?));
        tracing::info!(to = %email.support_address, "Email notifications enabled");
    }

    Ok(notifiers)
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Install rustls crypto provider (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| ServerError::CryptoProvider)?;

    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // No subscriber yet; log through a plain one so the reason is visible
            init_tracing(false);
            return Err(e.into());
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.json_logs);

    let repos = open_storage(&config.storage).await?;

    let (notifications, worker) =
        NotificationDispatcher::spawn(build_notifiers(&config)?, config.notifications);
    if worker.is_none() {
        tracing::warn!("No notification channels configured");
    }

    tracing::info!(policy = %config.access_policy, "Authorization policy");
    let state = AppState::new(
        &config.jwt,
        config.access_policy,
        repos,
        notifications,
        Clock::System,
    );

    let app = otelier_api::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();

    if let Some(tls_config) = &config.tls {
        let rustls_config = RustlsConfig::from_pem(
            tls_config.cert_pem.as_bytes().to_vec(),
            tls_config.key_pem.expose_secret().as_bytes().to_vec(),
        )
        .await?;

        tracing::info!("otelier-api listening on https://{}", addr);

        let handle = Handle::new();
        let shutdown_handle = handle.clone();

        // Spawn task to handle graceful shutdown
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown_handle.graceful_shutdown(Some(Duration::from_secs(30)));
        });

        axum_server::bind_rustls(addr, rustls_config)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;
    } else {
        tracing::info!("otelier-api listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    }

    // The router (and every dispatcher clone in it) is gone; let queued jobs finish
    if let Some(worker) = worker {
        tracing::info!("Draining notification queue");
        if tokio::time::timeout(NOTIFICATION_DRAIN_TIMEOUT, worker).await.is_err() {
            tracing::warn!("Notification queue not drained before timeout");
        }
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
