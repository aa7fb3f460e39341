use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::{Postgres, QueryBuilder};

use crate::error::ApiError;
use crate::models::problem::{Problem, ProblemRef};
use crate::models::solution::{Solution, SolutionBrief};
use crate::models::user::{Role, User, UserSummary};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub total: i64,
    pub pages: i64,
    pub current_page: i64,
    pub data: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserSummary,
    pub created_problems: Vec<ProblemRef>,
    pub solutions: Vec<SolutionBrief>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: i32,
}

fn push_user_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &UserListQuery) {
    if let Some(role) = query.role {
        qb.push(" AND role = ").push_bind(role);
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (username ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR email ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

/// GET /api/users - admin/interviewer only, ordered by rating
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserPage>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).max(1);
    let offset = (page - 1) * limit;

    let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM users WHERE 1=1");
    push_user_filters(&mut count_qb, &query);
    let total = count_qb.build_query_scalar::<i64>().fetch_one(&state.pool).await?;

    let mut qb = QueryBuilder::new(
        "SELECT id, username, email, role, rating, created_at FROM users WHERE 1=1",
    );
    push_user_filters(&mut qb, &query);
    qb.push(" ORDER BY rating DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let data = qb.build_query_as::<UserSummary>().fetch_all(&state.pool).await?;

    Ok(Json(UserPage {
        total,
        pages: (total + limit - 1) / limit,
        current_page: page,
        data,
    }))
}

/// GET /api/users/:id - any authenticated user
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserProfile>, ApiError> {
    let user = User::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let created_problems = Problem::created_by(&state.pool, id).await?;
    let solutions = Solution::briefs_for_user(&state.pool, id).await?;

    Ok(Json(UserProfile {
        user: UserSummary {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            rating: user.rating,
            created_at: user.created_at,
        },
        created_problems,
        solutions,
    }))
}

/// PUT /api/users/:id/role - admin only
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<User>, ApiError> {
    let role: Role = body
        .role
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid role"))?;

    if User::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let updated = User::set_role(&state.pool, id, role).await?;

    Ok(Json(updated))
}

/// PUT /api/users/:id/rating - admin/interviewer only
pub async fn update_user_rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateRatingRequest>,
) -> Result<Json<User>, ApiError> {
    if body.rating < 0 {
        return Err(ApiError::bad_request("Invalid rating value"));
    }

    if User::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    let updated = User::set_rating(&state.pool, id, body.rating).await?;

    Ok(Json(updated))
}

/// PUT /api/users/:id/deactivate - admin only
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    if User::find_by_id(&state.pool, id).await?.is_none() {
        return Err(ApiError::not_found("User not found"));
    }

    User::deactivate(&state.pool, id).await?;

    Ok(Json(json!({ "message": "User deactivated successfully" })))
}
