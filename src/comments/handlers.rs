use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser},
    comments::repo::Comment,
    error::ApiError,
    posts::repo::Post,
    state::AppState,
};

use super::dto::CommentBody;

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/comments/:post_id", get(list_comments).post(create_comment))
        .route("/comments/:post_id/:id", delete(delete_comment))
}

/// Any authenticated user may comment on any existing post.
#[instrument(skip(state, body))]
pub async fn create_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CommentBody>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let content = body
        .content
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("Content is required".into()))?;

    if !Post::exists(&state.db, post_id).await? {
        return Err(ApiError::NotFound("Post not found".into()));
    }

    let comment = Comment::create(&state.db, post_id, user_id, &content).await?;
    info!(user_id = %user_id, post_id = %post_id, comment_id = %comment.id, "comment created");
    Ok((StatusCode::CREATED, Json(comment)))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    if !Post::exists(&state.db, post_id).await? {
        return Err(ApiError::NotFound("Post not found".into()));
    }
    let comments = Comment::list_by_post(&state.db, post_id).await?;
    Ok(Json(comments))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((_post_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Comment::delete_authored(&state.db, id, user_id).await? {
        return Err(ApiError::NotFound(
            "Comment not found or unauthorized".into(),
        ));
    }
    info!(user_id = %user_id, comment_id = %id, "comment deleted");
    Ok(Json(MessageResponse {
        message: "Deleted successfully".into(),
    }))
}
