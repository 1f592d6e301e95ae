use axum::{
    http::{HeaderValue, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use game::{SaveOutcome, Scored};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, TextEncoder, register_int_counter};

use crate::error::ApiError;

pub static PROMPTS_EVALUATED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("prompts_evaluated_total", "Prompts scored against an image")
        .expect("prompts_evaluated_total registers once")
});

pub static SCORE_SAVE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "score_save_failures_total",
        "Evaluations whose score record could not be written"
    )
    .expect("score_save_failures_total registers once")
});

pub static SESSIONS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("game_sessions_created_total", "Game sessions started")
        .expect("game_sessions_created_total registers once")
});

/// Registers every counter so `/metrics` lists them before the first event.
pub fn register() {
    Lazy::force(&PROMPTS_EVALUATED);
    Lazy::force(&SCORE_SAVE_FAILURES);
    Lazy::force(&SESSIONS_CREATED);
}

pub fn record_evaluation(scored: &Scored) {
    PROMPTS_EVALUATED.inc();
    if scored.saved == SaveOutcome::Failed {
        SCORE_SAVE_FAILURES.inc();
    }
}

pub async fn handler() -> Result<Response, ApiError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(anyhow::Error::from)?;
    let mut response = buffer.into_response();
    if let Ok(content_type) = HeaderValue::from_str(encoder.format_type()) {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}
