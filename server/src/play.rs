use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use game::{
    Difficulty, FinalResult, GameScore, GameSession, ImageId, RoundProgress, validate_prompt,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::CurrentUser, error::ApiError, metrics};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/game", post(create_game))
        .route("/game/submit", post(submit_round))
        .route("/game/advance", post(advance_round))
        .route("/evaluate", post(evaluate))
        .route("/score", post(preview))
}

#[derive(Deserialize)]
struct CreateGame {
    difficulty: Option<String>,
}

async fn create_game(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateGame>, JsonRejection>,
) -> Result<Json<GameSession>, ApiError> {
    let Json(payload) = payload?;
    let difficulty: Difficulty = payload
        .difficulty
        .ok_or_else(|| ApiError::BadRequest("Invalid difficulty level".into()))?
        .parse()?;
    log::info!("creating {difficulty} game");

    let session = state.sessions.create_session(difficulty).await?;
    metrics::SESSIONS_CREATED.inc();
    Ok(Json(session))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRound {
    session: Option<GameSession>,
    image_id: Option<ImageId>,
    user_prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub session: GameSession,
    pub evaluation: GameScore,
}

async fn submit_round(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<SubmitRound>, JsonRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let Json(payload) = payload?;
    let (Some(mut session), Some(image_id), Some(prompt)) =
        (payload.session, payload.image_id, payload.user_prompt)
    else {
        return Err(ApiError::missing_fields());
    };
    validate_prompt(&prompt)?;

    let scored = state
        .sessions
        .submit_round(&mut session, image_id, &prompt, user)
        .await?;
    metrics::record_evaluation(&scored);
    Ok(Json(SubmitResponse {
        session,
        evaluation: scored.result,
    }))
}

#[derive(Deserialize)]
struct AdvanceRound {
    session: Option<GameSession>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceResponse {
    pub session: GameSession,
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FinalResult>,
}

async fn advance_round(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AdvanceRound>, JsonRejection>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let Json(payload) = payload?;
    let mut session = payload.session.ok_or_else(ApiError::missing_fields)?;

    let progress = state.sessions.advance_round(&mut session)?;
    let finished = progress == RoundProgress::Finished;
    let result = if finished { session.finish() } else { None };
    Ok(Json(AdvanceResponse {
        session,
        finished,
        result,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Evaluate {
    image_id: Option<ImageId>,
    user_prompt: Option<String>,
}

async fn evaluate(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<Evaluate>, JsonRejection>,
) -> Result<Json<GameScore>, ApiError> {
    let Json(payload) = payload?;
    let (Some(image_id), Some(prompt)) = (payload.image_id, payload.user_prompt) else {
        return Err(ApiError::missing_fields());
    };
    validate_prompt(&prompt)?;
    log::info!("evaluating prompt for image {image_id}");

    let scored = state.sessions.evaluate(image_id, &prompt, user).await?;
    metrics::record_evaluation(&scored);
    Ok(Json(scored.result))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewRequest {
    user_prompt: Option<String>,
    ideal_prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub score: u8,
    pub feedback: String,
    pub ideal_prompt: String,
}

/// Scores two prompts directly. Nothing is recorded.
async fn preview(
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<Preview>, ApiError> {
    let Json(payload) = payload?;
    let (Some(user_prompt), Some(ideal_prompt)) = (payload.user_prompt, payload.ideal_prompt)
    else {
        return Err(ApiError::missing_fields());
    };
    if user_prompt.trim().is_empty() || ideal_prompt.trim().is_empty() {
        return Err(ApiError::missing_fields());
    }

    let evaluation = scoring::evaluate(&user_prompt, &ideal_prompt);
    Ok(Json(Preview {
        score: evaluation.score,
        feedback: evaluation.feedback,
        ideal_prompt,
    }))
}
