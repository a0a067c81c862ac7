use serde::Deserialize;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::catalog::normalize_list;
use crate::errors::AppError;
use crate::models::profile::ProfileRow;

/// Fields captured by the sign-up wizard.
#[derive(Debug, Clone, Default)]
pub struct NewProfile {
    pub full_name: String,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_year: Option<i32>,
    pub company_name: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
}

/// Editable profile fields; a PUT replaces all of them.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub full_name: String,
    #[validate(length(max = 160))]
    pub headline: Option<String>,
    #[validate(length(max = 4000))]
    pub bio: Option<String>,
    pub location: Option<String>,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "must be a plausible year"))]
    pub graduation_year: Option<i32>,
    pub company_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Blank optional strings are stored as NULL.
fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn insert_profile<'e>(
    db: impl PgExecutor<'e>,
    user_id: Uuid,
    profile: &NewProfile,
) -> Result<ProfileRow, AppError> {
    Ok(sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (id, full_name, institution, field_of_study, graduation_year,
             company_name, skills, interests)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&profile.full_name)
    .bind(blank_to_none(&profile.institution))
    .bind(blank_to_none(&profile.field_of_study))
    .bind(profile.graduation_year)
    .bind(blank_to_none(&profile.company_name))
    .bind(&profile.skills)
    .bind(&profile.interests)
    .fetch_one(db)
    .await?)
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    input: &ProfileInput,
) -> Result<ProfileRow, AppError> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET
            full_name = $2, headline = $3, bio = $4, location = $5,
            institution = $6, field_of_study = $7, graduation_year = $8,
            company_name = $9, phone = $10, avatar_url = $11,
            skills = $12, interests = $13, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(input.full_name.trim())
    .bind(blank_to_none(&input.headline))
    .bind(blank_to_none(&input.bio))
    .bind(blank_to_none(&input.location))
    .bind(blank_to_none(&input.institution))
    .bind(blank_to_none(&input.field_of_study))
    .bind(input.graduation_year)
    .bind(blank_to_none(&input.company_name))
    .bind(blank_to_none(&input.phone))
    .bind(blank_to_none(&input.avatar_url))
    .bind(normalize_list(&input.skills))
    .bind(normalize_list(&input.interests))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))
}
