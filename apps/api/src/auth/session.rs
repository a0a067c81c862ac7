use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{generate_session_token, hash_session_token};
use crate::errors::AppError;
use crate::models::user::UserRow;

/// A freshly issued session. `token` is only ever shown to the client once.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    ttl_hours: i64,
) -> Result<IssuedSession, AppError> {
    let token = generate_session_token();
    let ttl = Duration::try_hours(ttl_hours)
        .ok_or_else(|| anyhow!("session ttl of {ttl_hours}h is out of range"))?;
    let expires_at = Utc::now() + ttl;

    sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(hash_session_token(&token))
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await?;

    Ok(IssuedSession { token, expires_at })
}

/// Resolves a session digest to its user, ignoring expired sessions.
pub async fn find_session_user(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<UserRow>, AppError> {
    Ok(sqlx::query_as::<_, UserRow>(
        r#"
        SELECT u.*
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token_hash = $1 AND s.expires_at > now()
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?)
}

pub async fn delete_session(pool: &PgPool, token_hash: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(token_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn purge_expired_sessions(pool: &PgPool) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
        .execute(pool)
        .await?;
    let purged = result.rows_affected();
    if purged > 0 {
        info!("Purged {purged} expired sessions");
    }
    Ok(purged)
}
