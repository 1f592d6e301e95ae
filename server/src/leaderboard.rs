use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::Deserialize;

use ::leaderboard::{DEFAULT_LIMIT, DifficultyFilter, LeaderboardEntry, PlayerStats};

use crate::{AppState, auth::CurrentUser, error::ApiError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/leaderboard", get(get_leaderboard))
        .route("/me/stats", get(get_stats))
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    difficulty: Option<String>,
    limit: Option<usize>,
}

async fn get_leaderboard(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LeaderboardQuery>, QueryRejection>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let Query(query) = query?;
    let filter: DifficultyFilter = query.difficulty.as_deref().unwrap_or("all").parse()?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIMIT)
        .min(state.leaderboard_max_limit);

    let entries = state.leaderboard.top(filter, limit).await?;
    Ok(Json(entries))
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<PlayerStats>, ApiError> {
    let user_id = user.require()?;
    Ok(Json(state.leaderboard.player_stats(user_id).await?))
}
