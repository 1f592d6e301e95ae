pub mod auth;
pub mod config;
pub mod error;
pub mod images;
pub mod leaderboard;
pub mod metrics;
pub mod play;
pub mod seed;

#[cfg(test)]
mod test_logger;

use std::{path::Path, sync::Arc};

use anyhow::Result;
use axum::{
    Json, Router,
    http::{HeaderValue, header::CACHE_CONTROL},
    routing::{get, get_service},
};
use game::{IdentityProvider, ImageCatalog, MemoryStore, ScoreLedger, SessionManager};
use migration::{Migrator, MigratorTrait};
use serde_json::{Value, json};
use storage::SeaOrmStore;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer};

use ::leaderboard::LeaderboardService;
pub use config::{Cli, DatabaseConfig, GameConfig};

pub struct AppState {
    pub sessions: SessionManager,
    pub catalog: Arc<dyn ImageCatalog>,
    pub leaderboard: LeaderboardService,
    pub identity: Arc<dyn IdentityProvider>,
    pub leaderboard_max_limit: usize,
}

impl AppState {
    /// State over one store that plays every collaborator role.
    pub fn new<S>(store: S, config: &GameConfig) -> Self
    where
        S: ImageCatalog + ScoreLedger + IdentityProvider + 'static,
    {
        let store = Arc::new(store);
        Self::from_parts(store.clone(), store.clone(), store, config)
    }

    pub fn from_parts(
        catalog: Arc<dyn ImageCatalog>,
        ledger: Arc<dyn ScoreLedger>,
        identity: Arc<dyn IdentityProvider>,
        config: &GameConfig,
    ) -> Self {
        let sessions = SessionManager::new(catalog.clone(), ledger.clone())
            .with_rounds(usize::from(config.rounds))
            .with_selection(config.selection);
        let leaderboard = LeaderboardService::new(ledger, identity.clone());
        Self {
            sessions,
            catalog,
            leaderboard,
            identity,
            leaderboard_max_limit: config.leaderboard_max_limit,
        }
    }
}

/// Builds the application state, connecting and migrating the database when
/// one is configured and falling back to an in-memory store otherwise.
pub async fn setup(cli: &Cli) -> Result<Arc<AppState>> {
    let state = match &cli.database.url {
        Some(url) => {
            let db = storage::connect(url, cli.database.max_connections).await?;
            Migrator::up(&db, None).await?;
            log::info!("database migrations applied");
            let store = SeaOrmStore::new(db);
            if cli.seed {
                seed::seed_database(&store).await?;
            }
            AppState::new(store, &cli.game)
        }
        None => {
            log::warn!("DATABASE_URL not set, scores are kept in memory only");
            let store = MemoryStore::new();
            if cli.seed {
                seed::seed_memory(&store);
            }
            AppState::new(store, &cli.game)
        }
    };
    Ok(Arc::new(state))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn app(state: Arc<AppState>, assets_dir: &Path) -> Router {
    metrics::register();
    let images_service = get_service(ServeDir::new(assets_dir)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=31536000, immutable"),
        ),
    );

    let api = Router::new()
        .merge(play::routes())
        .merge(images::routes())
        .merge(leaderboard::routes());

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::handler))
        .nest("/api", api)
        .nest_service("/images", images_service)
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutting down");
}
