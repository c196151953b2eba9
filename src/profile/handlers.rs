use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{dto::ProfileUpdate, services::update_profile};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState, users::User};

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me))
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

#[instrument(skip_all, fields(user_id = user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let Json(update) = payload?;
    let updated = update_profile(state.store.as_ref(), user, update).await?;
    Ok(Json(updated))
}
