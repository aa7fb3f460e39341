use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::token::Principal;
use crate::error::ApiError;
use crate::models::problem::Problem;
use crate::models::solution::{Solution, SolutionWithProblem, SolutionWithUser};
use crate::AppState;

// Evaluation is stubbed until a judge service exists; every submission is
// accepted with a fixed run time.
const STUB_IS_CORRECT: bool = true;
const STUB_EXECUTION_TIME: f64 = 0.42;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSolutionRequest {
    pub problem_id: i64,
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "Language is required"))]
    pub language: String,
}

/// POST /api/solutions
pub async fn submit_solution(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<SubmitSolutionRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    body.validate()?;

    if Problem::find_by_id(&state.pool, body.problem_id).await?.is_none() {
        return Err(ApiError::not_found("Problem not found"));
    }

    let solution = Solution::create(
        &state.pool,
        body.problem_id,
        principal.user_id,
        &body.code,
        &body.language,
        STUB_IS_CORRECT,
        STUB_EXECUTION_TIME,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Solution submitted successfully",
            "solution": {
                "id": solution.id,
                "isCorrect": solution.is_correct,
                "executionTime": solution.execution_time,
            }
        })),
    ))
}

/// GET /api/solutions/my - the caller's own submissions
pub async fn my_solutions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<SolutionWithProblem>>, ApiError> {
    Ok(Json(Solution::for_user(&state.pool, principal.user_id).await?))
}

/// GET /api/solutions/problem/:problemId - submissions for a problem,
/// fastest first
pub async fn problem_solutions(
    State(state): State<AppState>,
    Path(problem_id): Path<i64>,
) -> Result<Json<Vec<SolutionWithUser>>, ApiError> {
    Ok(Json(Solution::for_problem(&state.pool, problem_id).await?))
}
