use axum::{
    extract::{Path, Query, State},
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
use crate::models::material::{Material, MaterialFilter, MaterialType, MaterialWithUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MaterialListQuery {
    #[serde(rename = "type")]
    pub kind: Option<MaterialType>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MaterialRequest {
    #[validate(length(min = 1, max = 100, message = "Title cannot exceed 100 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MaterialType,
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,
}

/// GET /api/materials - public listing with filters
pub async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<MaterialListQuery>,
) -> Result<Json<Vec<MaterialWithUser>>, ApiError> {
    let filter = MaterialFilter {
        kind: query.kind,
        search: query.search,
    };

    Ok(Json(Material::search(&state.pool, &filter).await?))
}

/// GET /api/materials/:id - public
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MaterialWithUser>, ApiError> {
    Material::find_with_user(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Material not found"))
}

/// POST /api/materials - any authenticated user
pub async fn create_material(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<MaterialRequest>,
) -> Result<(StatusCode, Json<Material>), ApiError> {
    body.validate()?;

    let material = Material::create(
        &state.pool,
        &body.title,
        &body.content,
        body.kind,
        body.url.as_deref(),
        principal.user_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(material)))
}

/// PUT /api/materials/:id - owner or admin
pub async fn update_material(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(body): Json<MaterialRequest>,
) -> Result<Json<Material>, ApiError> {
    let material = Material::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Material not found"))?;

    policy::ensure_can_mutate(
        &principal,
        material.user_id,
        OWNERSHIP_OVERRIDE,
        "Not authorized to update this material",
    )?;

    body.validate()?;

    let updated = Material::update(
        &state.pool,
        id,
        &body.title,
        &body.content,
        body.kind,
        body.url.as_deref(),
    )
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/materials/:id - owner or admin
pub async fn delete_material(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let material = Material::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Material not found"))?;

    policy::ensure_can_mutate(
        &principal,
        material.user_id,
        OWNERSHIP_OVERRIDE,
        "Not authorized to delete this material",
    )?;

    Material::delete(&state.pool, id).await?;

    Ok(Json(json!({ "message": "Material deleted successfully" })))
}
