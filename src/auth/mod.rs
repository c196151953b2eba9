use crate::state::AppState;
use axum::Router;

mod claims;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod services;

pub use claims::Claims;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
