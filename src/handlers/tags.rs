use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::error::ApiError;
use crate::models::problem::Problem;
use crate::models::tag::{Tag, TagWithCount};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 2, max = 30, message = "Tag name must be between 2-30 characters"))]
    pub name: String,
}

fn validate_tag_name(name: &str) -> Result<(), ApiError> {
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ' ') {
        return Err(ApiError::bad_request(
            "Tag name can only contain letters, numbers, hyphens and spaces",
        ));
    }
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505")
}

/// GET /api/tags - public, with per-tag problem counts
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagWithCount>>, ApiError> {
    Ok(Json(Tag::list_with_counts(&state.pool).await?))
}

/// GET /api/tags/:id/problems - public, active problems carrying the tag
pub async fn tag_problems(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Problem>>, ApiError> {
    if Tag::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Tag not found"));
    }

    Ok(Json(Tag::problems(&state.pool, id).await?))
}

/// POST /api/tags - admin/interviewer only
pub async fn create_tag(
    State(state): State<AppState>,
    Json(body): Json<TagRequest>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    body.validate()?;
    validate_tag_name(&body.name)?;

    match Tag::create(&state.pool, &body.name).await {
        Ok(tag) => Ok((StatusCode::CREATED, Json(tag))),
        Err(err) if is_unique_violation(&err) => Err(ApiError::bad_request("Tag already exists")),
        Err(err) => Err(err.into()),
    }
}

/// PUT /api/tags/:id - admin/interviewer only
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<TagRequest>,
) -> Result<Json<Tag>, ApiError> {
    if Tag::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Tag not found"));
    }

    body.validate()?;
    validate_tag_name(&body.name)?;

    match Tag::rename(&state.pool, id, &body.name).await {
        Ok(tag) => Ok(Json(tag)),
        Err(err) if is_unique_violation(&err) => Err(ApiError::bad_request("Tag already exists")),
        Err(err) => Err(err.into()),
    }
}

/// DELETE /api/tags/:id - admin/interviewer only
pub async fn delete_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if Tag::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("Tag not found"));
    }

    Tag::delete(&state.pool, id).await?;

    Ok(Json(json!({ "message": "Tag deleted successfully" })))
}
