use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::policy::{self, OWNERSHIP_OVERRIDE};
use crate::auth::token::Principal;
use crate::error::ApiError;
use crate::models::comment::{Comment, CommentWithUser};
use crate::models::problem::Problem;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub problem_id: i64,
    #[validate(length(min = 1, max = 1000, message = "Comment cannot exceed 1000 characters"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment cannot exceed 1000 characters"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

/// POST /api/comments
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentWithUser>), ApiError> {
    body.validate()?;

    if Problem::find_by_id(&state.pool, body.problem_id).await?.is_none() {
        return Err(ApiError::not_found("Problem not found"));
    }

    let comment = Comment::create(
        &state.pool,
        body.problem_id,
        principal.user_id,
        &body.content,
        body.rating,
    )
    .await?;

    let with_user = Comment::find_with_user(&state.pool, comment.id)
        .await?
        .ok_or_else(|| ApiError::internal_server_error("Failed to load created comment"))?;

    Ok((StatusCode::CREATED, Json(with_user)))
}

/// GET /api/comments/problem/:problemId
pub async fn problem_comments(
    State(state): State<AppState>,
    Path(problem_id): Path<i64>,
) -> Result<Json<Vec<CommentWithUser>>, ApiError> {
    Ok(Json(Comment::for_problem(&state.pool, problem_id).await?))
}

/// PUT /api/comments/:id - owner or admin
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let comment = Comment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    policy::ensure_can_mutate(
        &principal,
        comment.user_id,
        OWNERSHIP_OVERRIDE,
        "Not authorized to update this comment",
    )?;

    body.validate()?;

    let updated = Comment::update(&state.pool, id, &body.content, body.rating).await?;

    Ok(Json(updated))
}

/// DELETE /api/comments/:id - owner or admin
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let comment = Comment::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    policy::ensure_can_mutate(
        &principal,
        comment.user_id,
        OWNERSHIP_OVERRIDE,
        "Not authorized to delete this comment",
    )?;

    Comment::delete(&state.pool, id).await?;

    Ok(Json(json!({ "message": "Comment deleted successfully" })))
}
