use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::models::problem::Problem;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TagWithCount {
    pub id: i64,
    pub name: String,
    pub problem_count: i64,
}

impl Tag {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_names(pool: &PgPool, names: &[String]) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags WHERE name = ANY($1)")
            .bind(names)
            .fetch_all(pool)
            .await
    }

    /// Tags with how many problems carry each, most used first.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<TagWithCount>, sqlx::Error> {
        sqlx::query_as::<_, TagWithCount>(
            "SELECT t.id, t.name, COUNT(pt.problem_id) AS problem_count \
             FROM tags t LEFT JOIN problem_tags pt ON pt.tag_id = t.id \
             GROUP BY t.id ORDER BY problem_count DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        sqlx::query_as::<_, Tag>("INSERT INTO tags (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn rename(pool: &PgPool, id: i64, name: &str) -> Result<Tag, sqlx::Error> {
        sqlx::query_as::<_, Tag>("UPDATE tags SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM tags WHERE id = $1").bind(id).execute(pool).await?;
        Ok(())
    }

    /// Active problems carrying this tag.
    pub async fn problems(pool: &PgPool, tag_id: i64) -> Result<Vec<Problem>, sqlx::Error> {
        sqlx::query_as::<_, Problem>(
            "SELECT p.* FROM problems p \
             JOIN problem_tags pt ON pt.problem_id = p.id \
             WHERE pt.tag_id = $1 AND p.is_active ORDER BY p.created_at DESC",
        )
        .bind(tag_id)
        .fetch_all(pool)
        .await
    }
}
