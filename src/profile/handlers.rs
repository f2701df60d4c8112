use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::PublicUser,
        extractors::AuthUser,
        repo::User,
        services::{is_valid_email, non_empty},
    },
    error::ApiError,
    state::AppState,
};

use super::dto::UpdateProfileRequest;

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(PublicUser {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let (username, email) = match (non_empty(payload.username), non_empty(payload.email)) {
        (Some(u), Some(e)) => (u, e),
        _ => {
            return Err(ApiError::Validation(
                "Username and email are required".into(),
            ))
        }
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email format".into()));
    }

    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    // Uniqueness only matters when the field actually changes.
    if username != user.username && User::find_by_username(&state.db, &username).await?.is_some() {
        return Err(ApiError::Validation("Username already in use".into()));
    }

    if email != user.email && User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Validation("Email already in use".into()));
    }

    let updated = User::update_profile(&state.db, user_id, &username, &email).await?;
    info!(user_id = %user_id, "profile updated");

    Ok(Json(PublicUser {
        id: updated.id,
        username: updated.username,
        email: updated.email,
    }))
}
