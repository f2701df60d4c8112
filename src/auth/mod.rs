use crate::state::AppState;
use axum::Router;

pub(crate) mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
mod repo_types;
pub(crate) mod services;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
