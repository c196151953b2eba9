use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{LoginRequest, RegisterRequest, RegisterResponse, TokenResponse},
    jwt::TokenCodec,
    services,
};
use crate::{error::AppError, state::AppState};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(req) = payload?;
    let created = services::register(state.store.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, codec, payload))]
pub async fn login(
    State(state): State<AppState>,
    State(codec): State<TokenCodec>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Json(req) = payload?;
    let token = services::login(state.store.as_ref(), &codec, req).await?;
    Ok(Json(token))
}
