use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::models::user::UserRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "material_type", rename_all = "lowercase")]
pub enum MaterialType {
    Article,
    Video,
    Cheatsheet,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: MaterialType,
    pub url: Option<String>,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialWithUser {
    #[serde(flatten)]
    pub material: Material,
    pub user: UserRef,
}

#[derive(Debug, FromRow)]
struct MaterialUserRow {
    id: i64,
    title: String,
    content: String,
    #[sqlx(rename = "type")]
    kind: MaterialType,
    url: Option<String>,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_id: i64,
    author_username: String,
}

impl From<MaterialUserRow> for MaterialWithUser {
    fn from(row: MaterialUserRow) -> Self {
        MaterialWithUser {
            material: Material {
                id: row.id,
                title: row.title,
                content: row.content,
                kind: row.kind,
                url: row.url,
                user_id: row.user_id,
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

#[derive(Debug, Default)]
pub struct MaterialFilter {
    pub kind: Option<MaterialType>,
    pub search: Option<String>,
}

impl Material {
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Material>, sqlx::Error> {
        sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_with_user(pool: &PgPool, id: i64) -> Result<Option<MaterialWithUser>, sqlx::Error> {
        let row = sqlx::query_as::<_, MaterialUserRow>(
            "SELECT m.*, u.id AS author_id, u.username AS author_username \
             FROM materials m JOIN users u ON u.id = m.user_id WHERE m.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(MaterialWithUser::from))
    }

    pub async fn search(pool: &PgPool, filter: &MaterialFilter) -> Result<Vec<MaterialWithUser>, sqlx::Error> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT m.*, u.id AS author_id, u.username AS author_username \
             FROM materials m JOIN users u ON u.id = m.user_id WHERE 1=1",
        );
        if let Some(kind) = filter.kind {
            qb.push(" AND m.type = ").push_bind(kind);
        }
        if let Some(search) = &filter.search {
            qb.push(" AND m.title ILIKE ").push_bind(format!("%{}%", search));
        }
        qb.push(" ORDER BY m.created_at DESC");
        let rows = qb.build_query_as::<MaterialUserRow>().fetch_all(pool).await?;
        Ok(rows.into_iter().map(MaterialWithUser::from).collect())
    }

    pub async fn create(
        pool: &PgPool,
        title: &str,
        content: &str,
        kind: MaterialType,
        url: Option<&str>,
        user_id: i64,
    ) -> Result<Material, sqlx::Error> {
        sqlx::query_as::<_, Material>(
            "INSERT INTO materials (title, content, type, url, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(title)
        .bind(content)
        .bind(kind)
        .bind(url)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        title: &str,
        content: &str,
        kind: MaterialType,
        url: Option<&str>,
    ) -> Result<Material, sqlx::Error> {
        sqlx::query_as::<_, Material>(
            "UPDATE materials SET title = $2, content = $3, type = $4, \
             url = COALESCE($5, url), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(kind)
        .bind(url)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM materials WHERE id = $1").bind(id).execute(pool).await?;
        Ok(())
    }
}
