use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{
        dto::MessageResponse,
        extractors::AuthUser,
        services::non_empty,
    },
    error::ApiError,
    posts::repo::Post,
    state::AppState,
};

use super::dto::{PostBody, SearchParams};

pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id", get(get_post).put(update_post).delete(delete_post))
}

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search", get(search_posts))
}

fn require_body(body: PostBody) -> Result<(String, String), ApiError> {
    match (non_empty(body.title), non_empty(body.content)) {
        (Some(t), Some(c)) => Ok((t, c)),
        _ => Err(ApiError::Validation("Title and content are required".into())),
    }
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = Post::list_by_user(&state.db, user_id).await?;
    Ok(Json(posts))
}

#[instrument(skip(state, body))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<PostBody>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let (title, content) = require_body(body)?;
    let post = Post::create(&state.db, user_id, &title, &content).await?;
    info!(user_id = %user_id, post_id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let post = Post::find_owned(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found or unauthorized".into()))?;
    Ok(Json(post))
}

#[instrument(skip(state, body))]
pub async fn update_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<PostBody>,
) -> Result<Json<Post>, ApiError> {
    // Ownership check first so a foreign post 404s before validation.
    if Post::find_owned(&state.db, id, user_id).await?.is_none() {
        return Err(ApiError::NotFound("Post not found or unauthorized".into()));
    }
    let (title, content) = require_body(body)?;
    let post = Post::update_owned(&state.db, id, user_id, &title, &content)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found or unauthorized".into()))?;
    info!(user_id = %user_id, post_id = %post.id, "post updated");
    Ok(Json(post))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Post::delete_owned(&state.db, id, user_id).await? {
        return Err(ApiError::NotFound("Post not found or unauthorized".into()));
    }
    info!(user_id = %user_id, post_id = %id, "post deleted");
    Ok(Json(MessageResponse {
        message: "Deleted successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn search_posts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = Post::search_by_user(&state.db, user_id, &params.q).await?;
    Ok(Json(posts))
}
