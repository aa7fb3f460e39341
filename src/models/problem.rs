use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::models::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "difficulty", rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub test_cases: Value,
    pub constraints: String,
    pub examples: Value,
    pub hints: Option<String>,
    pub times_solved: i32,
    pub is_active: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shortened projection embedded in profiles and solution listings.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRef {
    pub id: i64,
    pub title: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Default)]
pub struct ProblemFilter {
    pub difficulty: Option<Difficulty>,
    pub search: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct NewProblem {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub test_cases: Value,
    pub constraints: String,
    pub examples: Value,
    pub hints: Option<String>,
    pub user_id: i64,
}

/// Field-level changes; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProblemChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub test_cases: Option<Value>,
    pub constraints: Option<String>,
    pub examples: Option<Value>,
    pub hints: Option<String>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProblemFilter) {
    if let Some(difficulty) = filter.difficulty {
        qb.push(" AND p.difficulty = ").push_bind(difficulty);
    }
    if let Some(search) = &filter.search {
        qb.push(" AND p.title ILIKE ").push_bind(format!("%{}%", search));
    }
    if let Some(tags) = &filter.tags {
        qb.push(
            " AND EXISTS (SELECT 1 FROM problem_tags pt JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.problem_id = p.id AND t.name = ANY(",
        )
        .push_bind(tags.clone())
        .push("))");
    }
}

impl Problem {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Problem>, sqlx::Error> {
        sqlx::query_as::<_, Problem>("SELECT * FROM problems WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn search(
        pool: &PgPool,
        filter: &ProblemFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Problem>, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT p.* FROM problems p WHERE 1=1");
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
        qb.build_query_as::<Problem>().fetch_all(pool).await
    }

    pub async fn count(pool: &PgPool, filter: &ProblemFilter) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM problems p WHERE 1=1");
        push_filters(&mut qb, filter);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    pub async fn create(pool: &PgPool, new: &NewProblem) -> Result<Problem, sqlx::Error> {
        sqlx::query_as::<_, Problem>(
            "INSERT INTO problems (title, description, difficulty, test_cases, constraints, examples, hints, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.difficulty)
        .bind(&new.test_cases)
        .bind(&new.constraints)
        .bind(&new.examples)
        .bind(&new.hints)
        .bind(new.user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update(pool: &PgPool, id: i64, changes: &ProblemChanges) -> Result<Problem, sqlx::Error> {
        sqlx::query_as::<_, Problem>(
            "UPDATE problems SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                difficulty = COALESCE($4, difficulty), \
                test_cases = COALESCE($5, test_cases), \
                constraints = COALESCE($6, constraints), \
                examples = COALESCE($7, examples), \
                hints = COALESCE($8, hints), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.difficulty)
        .bind(&changes.test_cases)
        .bind(&changes.constraints)
        .bind(&changes.examples)
        .bind(&changes.hints)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM problems WHERE id = $1").bind(id).execute(pool).await?;
        Ok(())
    }

    /// Replaces the problem's tag set with the tags matching the given names.
    /// Unknown names are ignored, matching the lookup-by-name semantics of tagging.
    pub async fn set_tags(pool: &PgPool, problem_id: i64, names: &[String]) -> Result<(), sqlx::Error> {
        let tags = Tag::find_by_names(pool, names).await?;
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM problem_tags WHERE problem_id = $1")
            .bind(problem_id)
            .execute(&mut *tx)
            .await?;
        for tag in &tags {
            sqlx::query("INSERT INTO problem_tags (problem_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(problem_id)
                .bind(tag.id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }

    pub async fn tags(pool: &PgPool, problem_id: i64) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name FROM tags t \
             JOIN problem_tags pt ON pt.tag_id = t.id \
             WHERE pt.problem_id = $1 ORDER BY t.name",
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await
    }

    pub async fn created_by(pool: &PgPool, user_id: i64) -> Result<Vec<ProblemRef>, sqlx::Error> {
        sqlx::query_as::<_, ProblemRef>(
            "SELECT id, title, difficulty FROM problems WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Difficulty::Medium).unwrap(), "medium");
        let d: Difficulty = serde_json::from_value(serde_json::json!("hard")).unwrap();
        assert_eq!(d, Difficulty::Hard);
        assert!(serde_json::from_value::<Difficulty>(serde_json::json!("extreme")).is_err());
    }
}
