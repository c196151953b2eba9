use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::jwt::{TokenCodec, TokenError};
use crate::{
    error::AppError,
    state::AppState,
    users::{User, UserStore},
};

const BEARER_PREFIX: &str = "Bearer ";

/// The authenticated principal of one request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Turns the request's bearer token into a stored user. Every step is
/// terminal on failure; nothing is cached between requests.
pub async fn authorize(
    headers: &HeaderMap,
    codec: &TokenCodec,
    store: &dyn UserStore,
) -> Result<User, AppError> {
    // Expect "Bearer <token>", exact case and a single space
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| AppError::unauthorized("missing bearer token"))?;

    let claims = codec.parse(token).map_err(|e| {
        warn!(error = %e, "rejected bearer token");
        match e {
            TokenError::InvalidSubject => AppError::unauthorized("invalid subject"),
            TokenError::InvalidToken | TokenError::Signing => {
                AppError::unauthorized("invalid token")
            }
        }
    })?;

    match store.find_by_id(claims.sub).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            warn!(user_id = claims.sub, "token subject not found");
            Err(AppError::unauthorized("user not found"))
        }
        Err(e) => {
            warn!(error = %e, user_id = claims.sub, "token subject lookup failed");
            Err(AppError::unauthorized("user not found"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(&parts.headers, &state.codec, state.store.as_ref())
            .await
            .map(AuthUser)
    }
}
