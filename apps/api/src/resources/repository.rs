use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::catalog::normalize_tags;
use crate::errors::{ensure_not_blank, AppError};
use crate::models::resource::{ResourceRow, ResourceType};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResourceInput {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 4000, message = "must be between 1 and 4000 characters"))]
    pub description: String,
    pub resource_type: ResourceType,
    #[validate(url(message = "must be a valid URL"))]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(max = 200))]
    pub author: Option<String>,
}

impl ResourceInput {
    pub fn check_not_blank(&self) -> Result<(), AppError> {
        ensure_not_blank(&[
            ("title", self.title.as_str()),
            ("description", self.description.as_str()),
        ])
    }
}

pub async fn list_resources(pool: &PgPool) -> Result<Vec<ResourceRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ResourceRow>("SELECT * FROM resources ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn get_resource(pool: &PgPool, id: Uuid) -> Result<Option<ResourceRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ResourceRow>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn create_resource(
    pool: &PgPool,
    created_by: Uuid,
    input: &ResourceInput,
) -> Result<ResourceRow, AppError> {
    Ok(sqlx::query_as::<_, ResourceRow>(
        r#"
        INSERT INTO resources (id, title, description, resource_type, url, tags, author, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.title.trim())
    .bind(input.description.trim())
    .bind(input.resource_type.as_str())
    .bind(&input.url)
    .bind(normalize_tags(&input.tags))
    .bind(input.author.as_deref())
    .bind(created_by)
    .fetch_one(pool)
    .await?)
}

pub async fn update_resource(
    pool: &PgPool,
    id: Uuid,
    input: &ResourceInput,
) -> Result<ResourceRow, AppError> {
    sqlx::query_as::<_, ResourceRow>(
        r#"
        UPDATE resources SET
            title = $2, description = $3, resource_type = $4, url = $5,
            tags = $6, author = $7, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.title.trim())
    .bind(input.description.trim())
    .bind(input.resource_type.as_str())
    .bind(&input.url)
    .bind(normalize_tags(&input.tags))
    .bind(input.author.as_deref())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resource {id} not found")))
}

pub async fn delete_resource(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM resources WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resource {id} not found")));
    }
    Ok(())
}
