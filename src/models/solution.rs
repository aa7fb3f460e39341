use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::problem::{Difficulty, ProblemRef};
use crate::models::user::UserRef;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    pub id: i64,
    pub problem_id: i64,
    pub user_id: i64,
    pub code: String,
    pub language: String,
    pub is_correct: bool,
    pub execution_time: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's submission with the problem it solves, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionWithProblem {
    #[serde(flatten)]
    pub solution: Solution,
    pub problem: ProblemRef,
}

/// A problem's submission with its author, fastest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionWithUser {
    #[serde(flatten)]
    pub solution: Solution,
    pub user: UserRef,
}

/// Trimmed submission used in user profiles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionBrief {
    pub id: i64,
    pub is_correct: bool,
    pub execution_time: f64,
    pub problem: ProblemBrief,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemBrief {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, FromRow)]
struct SolutionProblemRow {
    id: i64,
    problem_id: i64,
    user_id: i64,
    code: String,
    language: String,
    is_correct: bool,
    execution_time: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    p_id: i64,
    p_title: String,
    p_difficulty: Difficulty,
}

#[derive(Debug, FromRow)]
struct SolutionUserRow {
    id: i64,
    problem_id: i64,
    user_id: i64,
    code: String,
    language: String,
    is_correct: bool,
    execution_time: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
}

#[derive(Debug, FromRow)]
struct SolutionBriefRow {
    id: i64,
    is_correct: bool,
    execution_time: f64,
    p_id: i64,
    p_title: String,
}

impl Solution {
    pub async fn create(
        pool: &PgPool,
        problem_id: i64,
        user_id: i64,
        code: &str,
        language: &str,
        is_correct: bool,
        execution_time: f64,
    ) -> Result<Solution, sqlx::Error> {
        sqlx::query_as::<_, Solution>(
            "INSERT INTO solutions (problem_id, user_id, code, language, is_correct, execution_time) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(problem_id)
        .bind(user_id)
        .bind(code)
        .bind(language)
        .bind(is_correct)
        .bind(execution_time)
        .fetch_one(pool)
        .await
    }

    pub async fn for_user(pool: &PgPool, user_id: i64) -> Result<Vec<SolutionWithProblem>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SolutionProblemRow>(
            "SELECT s.*, p.id AS p_id, p.title AS p_title, p.difficulty AS p_difficulty \
             FROM solutions s JOIN problems p ON p.id = s.problem_id \
             WHERE s.user_id = $1 ORDER BY s.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SolutionWithProblem {
                problem: ProblemRef {
                    id: row.p_id,
                    title: row.p_title,
                    difficulty: row.p_difficulty,
                },
                solution: Solution {
                    id: row.id,
                    problem_id: row.problem_id,
                    user_id: row.user_id,
                    code: row.code,
                    language: row.language,
                    is_correct: row.is_correct,
                    execution_time: row.execution_time,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
            })
            .collect())
    }

    pub async fn for_problem(pool: &PgPool, problem_id: i64) -> Result<Vec<SolutionWithUser>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SolutionUserRow>(
            "SELECT s.*, u.id AS author_id, u.username AS author_username \
             FROM solutions s JOIN users u ON u.id = s.user_id \
             WHERE s.problem_id = $1 ORDER BY s.execution_time ASC",
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SolutionWithUser {
                user: UserRef {
                    id: row.author_id,
                    username: row.author_username,
                },
                solution: Solution {
                    id: row.id,
                    problem_id: row.problem_id,
                    user_id: row.user_id,
                    code: row.code,
                    language: row.language,
                    is_correct: row.is_correct,
                    execution_time: row.execution_time,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                },
            })
            .collect())
    }

    pub async fn briefs_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<SolutionBrief>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SolutionBriefRow>(
            "SELECT s.id, s.is_correct, s.execution_time, p.id AS p_id, p.title AS p_title \
             FROM solutions s JOIN problems p ON p.id = s.problem_id \
             WHERE s.user_id = $1 ORDER BY s.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SolutionBrief {
                id: row.id,
                is_correct: row.is_correct,
                execution_time: row.execution_time,
                problem: ProblemBrief {
                    id: row.p_id,
                    title: row.p_title,
                },
            })
            .collect())
    }
}
