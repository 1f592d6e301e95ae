//! Resolves the calling player from the request.
//!
//! Players sign in elsewhere; this side only maps a session token to a user
//! id. A request without a token, or with one the identity provider does not
//! know, is anonymous.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};
use game::UserId;

use crate::{AppState, error::ApiError};

pub const SESSION_COOKIE: &str = "session";

/// Token from `Authorization: Bearer` or the session cookie, in that order.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_owned());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, token)| *name == SESSION_COOKIE && !token.is_empty())
        .map(|(_, token)| token.to_owned())
}

/// The signed-in player, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub Option<UserId>);

impl CurrentUser {
    pub fn require(self) -> Result<UserId, ApiError> {
        self.0.ok_or(ApiError::Unauthorized)
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(CurrentUser(None));
        };
        match state.identity.resolve_token(&token).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(err) => {
                log::warn!("session lookup failed, continuing anonymously: {err:#}");
                Ok(CurrentUser(None))
            }
        }
    }
}
