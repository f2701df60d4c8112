use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;

/// Post CRUD; rate-limited in the app router.
pub fn router() -> Router<AppState> {
    handlers::post_routes()
}

/// Search is kept out of the rate-limited group.
pub fn search_router() -> Router<AppState> {
    handlers::search_routes()
}
