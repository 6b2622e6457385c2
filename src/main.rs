//! Dugout Back binary entrypoint wiring the league store, REST routes and SSE.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dugout_back::{
    config::{AppConfig, StorageKind},
    dao::{
        league_store::{LeagueStore, memory::MemoryLeagueStore},
        seed,
    },
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = open_store(&config).await?;

    let mut snapshot = store.load().await.context("loading league")?;
    if snapshot.is_empty() && config.seed_mock_data() {
        store
            .commit(seed::snapshot().into_mutations())
            .await
            .context("seeding demo club")?;
        snapshot = store.load().await.context("reloading seeded league")?;
        info!(backend = store.backend(), "empty store seeded with the demo club");
    }
    info!(
        backend = store.backend(),
        teams = snapshot.teams.len(),
        players = snapshot.players.len(),
        games = snapshot.games.len(),
        "league loaded"
    );

    let app_state = AppState::new(config, store, snapshot).context("restoring league")?;
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

/// Open the configured storage backend.
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn LeagueStore>> {
    match config.storage() {
        StorageKind::Memory => {
            warn!("memory storage selected; changes are lost on restart");
            Ok(Arc::new(MemoryLeagueStore::new()))
        }
        StorageKind::JsonFile => open_json_store(config).await,
    }
}

#[cfg(feature = "json-file-store")]
async fn open_json_store(config: &AppConfig) -> anyhow::Result<Arc<dyn LeagueStore>> {
    use dugout_back::dao::league_store::json_file::{JsonFileConfig, JsonFileLeagueStore};

    let store = JsonFileLeagueStore::open(JsonFileConfig::new(config.data_path().clone()))
        .await
        .with_context(|| format!("opening {}", config.data_path().display()))?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "json-file-store"))]
async fn open_json_store(_config: &AppConfig) -> anyhow::Result<Arc<dyn LeagueStore>> {
    anyhow::bail!("json_file storage requested but the `json-file-store` feature is disabled")
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

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
