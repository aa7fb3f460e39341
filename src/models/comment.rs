use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::user::UserRef;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub problem_id: i64,
    pub user_id: i64,
    pub content: String,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Comment with its author attached, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithUser {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: UserRef,
}

#[derive(Debug, FromRow)]
struct CommentUserRow {
    id: i64,
    problem_id: i64,
    user_id: i64,
    content: String,
    rating: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
}

impl From<CommentUserRow> for CommentWithUser {
    fn from(row: CommentUserRow) -> Self {
        CommentWithUser {
            comment: Comment {
                id: row.id,
                problem_id: row.problem_id,
                user_id: row.user_id,
                content: row.content,
                rating: row.rating,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            user: UserRef {
                id: row.author_id,
                username: row.author_username,
            },
        }
    }
}

impl Comment {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_user(pool: &PgPool, id: i64) -> Result<Option<CommentWithUser>, sqlx::Error> {
        let row = sqlx::query_as::<_, CommentUserRow>(
            "SELECT c.*, u.id AS author_id, u.username AS author_username \
             FROM comments c JOIN users u ON u.id = c.user_id WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(CommentWithUser::from))
    }

    pub async fn for_problem(pool: &PgPool, problem_id: i64) -> Result<Vec<CommentWithUser>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CommentUserRow>(
            "SELECT c.*, u.id AS author_id, u.username AS author_username \
             FROM comments c JOIN users u ON u.id = c.user_id \
             WHERE c.problem_id = $1 ORDER BY c.created_at DESC",
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(CommentWithUser::from).collect())
    }

    pub async fn create(
        pool: &PgPool,
        problem_id: i64,
        user_id: i64,
        content: &str,
        rating: Option<i32>,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (problem_id, user_id, content, rating) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(problem_id)
        .bind(user_id)
        .bind(content)
        .bind(rating)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        content: &str,
        rating: Option<i32>,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "UPDATE comments SET content = $2, rating = COALESCE($3, rating), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(content)
        .bind(rating)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM comments WHERE id = $1").bind(id).execute(pool).await?;
        Ok(())
    }
}
