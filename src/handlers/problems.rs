use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::policy::{self, OWNERSHIP_OVERRIDE};
use crate::auth::token::Principal;
use crate::error::ApiError;
use crate::models::comment::{Comment, CommentWithUser};
use crate::models::problem::{Difficulty, NewProblem, Problem, ProblemChanges, ProblemFilter};
use crate::models::tag::Tag;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProblemListQuery {
    pub difficulty: Option<Difficulty>,
    pub tags: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProblemPage {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub data: Vec<Problem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetail {
    #[serde(flatten)]
    pub problem: Problem,
    pub tags: Vec<Tag>,
    pub comments: Vec<CommentWithUser>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProblemRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub difficulty: Difficulty,
    pub test_cases: Value,
    #[validate(length(min = 1, message = "Constraints are required"))]
    pub constraints: String,
    pub examples: Value,
    pub hints: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProblemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub test_cases: Option<Value>,
    pub constraints: Option<String>,
    pub examples: Option<Value>,
    pub hints: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn require_non_empty_array(value: &Value, message: &str) -> Result<(), ApiError> {
    match value.as_array() {
        Some(items) if !items.is_empty() => Ok(()),
        _ => Err(ApiError::bad_request(message)),
    }
}

/// GET /api/problems - public listing with filters and pagination
pub async fn list_problems(
    State(state): State<AppState>,
    Query(query): Query<ProblemListQuery>,
) -> Result<Json<ProblemPage>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);
    let offset = (page - 1) * limit;

    let filter = ProblemFilter {
        difficulty: query.difficulty,
        search: query.search,
        tags: query
            .tags
            .map(|csv| csv.split(',').map(|s| s.trim().to_string()).collect()),
    };

    let total = Problem::count(&state.pool, &filter).await?;
    let data = Problem::search(&state.pool, &filter, limit, offset).await?;

    Ok(Json(ProblemPage {
        total,
        page,
        pages: (total + limit - 1) / limit,
        data,
    }))
}

/// GET /api/problems/:id - public detail with tags and comments
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProblemDetail>, ApiError> {
    let problem = Problem::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Problem not found"))?;

    let tags = Problem::tags(&state.pool, id).await?;
    let comments = Comment::for_problem(&state.pool, id).await?;

    Ok(Json(ProblemDetail { problem, tags, comments }))
}

/// POST /api/problems - admin/interviewer only
pub async fn create_problem(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateProblemRequest>,
) -> Result<(StatusCode, Json<Problem>), ApiError> {
    body.validate()?;
    require_non_empty_array(&body.test_cases, "Test cases must be a non-empty array")?;
    require_non_empty_array(&body.examples, "Examples must be a non-empty array")?;

    let problem = Problem::create(
        &state.pool,
        &NewProblem {
            title: body.title,
            description: body.description,
            difficulty: body.difficulty,
            test_cases: body.test_cases,
            constraints: body.constraints,
            examples: body.examples,
            hints: body.hints,
            user_id: principal.user_id,
        },
    )
    .await?;

    if let Some(tags) = &body.tags {
        if !tags.is_empty() {
            Problem::set_tags(&state.pool, problem.id, tags).await?;
        }
    }

    Ok((StatusCode::CREATED, Json(problem)))
}

/// PUT /api/problems/:id - owner or admin, behind the admin/interviewer gate
pub async fn update_problem(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateProblemRequest>,
) -> Result<Json<Problem>, ApiError> {
    let problem = Problem::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Problem not found"))?;

    policy::ensure_can_mutate(
        &principal,
        problem.user_id,
        OWNERSHIP_OVERRIDE,
        "Not authorized to update this problem",
    )?;

    if let Some(test_cases) = &body.test_cases {
        require_non_empty_array(test_cases, "Test cases must be a non-empty array")?;
    }
    if let Some(examples) = &body.examples {
        require_non_empty_array(examples, "Examples must be a non-empty array")?;
    }

    let updated = Problem::update(
        &state.pool,
        id,
        &ProblemChanges {
            title: body.title,
            description: body.description,
            difficulty: body.difficulty,
            test_cases: body.test_cases,
            constraints: body.constraints,
            examples: body.examples,
            hints: body.hints,
        },
    )
    .await?;

    if let Some(tags) = &body.tags {
        Problem::set_tags(&state.pool, id, tags).await?;
    }

    Ok(Json(updated))
}

/// DELETE /api/problems/:id - owner or admin, behind the admin/interviewer gate
pub async fn delete_problem(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let problem = Problem::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Problem not found"))?;

    policy::ensure_can_mutate(
        &principal,
        problem.user_id,
        OWNERSHIP_OVERRIDE,
        "Not authorized to delete this problem",
    )?;

    Problem::delete(&state.pool, id).await?;

    Ok(Json(json!({ "message": "Problem deleted successfully" })))
}
