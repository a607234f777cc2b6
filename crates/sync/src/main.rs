//! Poynt Bridge - order and transaction sync service.
//!
//! This binary runs two things:
//!
//! - a webhook server that receives onboarding credentials from the
//!   payments service (signed POSTs, see `routes::webhooks`)
//! - a background worker that drains the sync-job queue and pushes orders
//!   and transactions to the remote API
//!
//! Host storage is the in-memory implementation; a deployment embedding
//! this crate supplies its own [`poynt_bridge_sync::host`] implementations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use poynt_bridge_sync::config::AppConfig;
use poynt_bridge_sync::host::MemoryHost;
use poynt_bridge_sync::jobs::{
    self, JobDispatcher, PushOrdersProducer, PushTransactionsProducer, RegisterWebhooksProducer,
    StatusTransactionFlow,
};
use poynt_bridge_sync::poynt::PoyntClient;
use poynt_bridge_sync::routes;
use poynt_bridge_sync::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AppConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
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

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Initialize tracing with EnvFilter and Sentry integration
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "poynt_bridge=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Host platform storage. One MemoryHost backs every collaborator trait.
    let host = Arc::new(MemoryHost::new());

    let api = Arc::new(PoyntClient::new(&config.poynt, host.clone()));

    // Job dispatcher with every producer registered
    let dispatcher = Arc::new(
        JobDispatcher::new(host.clone(), host.clone())
            .with_producer(Arc::new(PushOrdersProducer::new(
                host.clone(),
                api.clone(),
                config.sync.default_currency,
                config.sync.local_delivery_method.clone(),
            )))
            .with_producer(Arc::new(PushTransactionsProducer::new(
                host.clone(),
                host.clone(),
                api.clone(),
                config.sync.default_currency,
                Arc::new(StatusTransactionFlow),
            )))
            .with_producer(Arc::new(RegisterWebhooksProducer::new(api, &config))),
    );

    let poll_interval = Duration::from_secs(config.sync.poll_interval_secs);
    tokio::spawn(jobs::run_worker(dispatcher, poll_interval));
    tracing::info!("job worker started");

    // Webhook server
    let state = AppState::new(&config, host);
    let app = routes::router(state);

    let addr = config.socket_addr();
    tracing::info!("webhook server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
