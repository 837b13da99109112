//! Riddle Rush backend binary entrypoint wiring REST, verification, and
//! storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::{
    answer_source::{offline::OfflineAnswers, petscan::PetScanClient},
    catalog::CategoryCatalog,
    session_store::{KeyValueStore, file::FileStore, memory::MemoryStore},
};
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();

    let catalog =
        CategoryCatalog::load(&config.categories_path).context("loading category dataset")?;
    info!(count = catalog.len(), "loaded category dataset");

    let offline_answers = OfflineAnswers::load(&config.offline_answers_path);
    let petscan = PetScanClient::new(&config.petscan).context("building PetScan client")?;

    // Persistence is best-effort: when the file store cannot be opened the
    // game runs in-memory and the health endpoint reports degraded.
    let (store, persistent): (Arc<dyn KeyValueStore>, bool) =
        match FileStore::open(&config.storage_dir) {
            Ok(store) => (Arc::new(store), true),
            Err(err) => {
                warn!(error = %err, "storage unavailable; falling back to in-memory store");
                (Arc::new(MemoryStore::new()), false)
            }
        };

    let app_state = AppState::new(config, catalog, offline_answers, petscan, store, persistent);
    app_state.hydrate().await;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
