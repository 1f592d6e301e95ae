use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use game::{Difficulty, GameImage};
use serde::Deserialize;

use crate::{AppState, error::ApiError};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/images", get(list_images))
}

#[derive(Deserialize)]
struct ImagesQuery {
    difficulty: Option<String>,
}

/// Catalog listing for players; ideal prompts are left out.
async fn list_images(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ImagesQuery>, QueryRejection>,
) -> Result<Json<Vec<GameImage>>, ApiError> {
    let Query(query) = query?;
    let difficulty = query
        .difficulty
        .as_deref()
        .map(str::parse::<Difficulty>)
        .transpose()?;
    let images = state.catalog.list(difficulty).await?;
    Ok(Json(images.iter().map(GameImage::from).collect()))
}
