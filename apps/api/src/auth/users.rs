use sqlx::{PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{generate_salt, hash_password};
use crate::config::AdminBootstrap;
use crate::errors::AppError;
use crate::models::user::{Role, User, UserRow};
use crate::profiles::repository::{insert_profile, NewProfile};

pub async fn insert_user<'e>(
    db: impl PgExecutor<'e>,
    pepper: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<UserRow, AppError> {
    let salt = generate_salt();
    let hash = hash_password(pepper, &salt, password)?;

    Ok(sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, email, password_hash, password_salt, role)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(hash)
    .bind(salt)
    .bind(role.as_str())
    .fetch_one(db)
    .await?)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, AppError> {
    Ok(
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, AppError> {
    Ok(sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, AppError> {
    Ok(sqlx::query_as::<_, User>(
        "SELECT id, email, role, created_at FROM users ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn update_role(pool: &PgPool, user_id: Uuid, role: Role) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET role = $1 WHERE id = $2 RETURNING id, email, role, created_at",
    )
    .bind(role.as_str())
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// Emails are matched case-insensitively by storing them lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Ensures the configured admin account exists and holds the admin role.
pub async fn bootstrap_admin(
    pool: &PgPool,
    pepper: &str,
    admin: &AdminBootstrap,
) -> Result<(), AppError> {
    let email = normalize_email(&admin.email);

    if let Some(existing) = find_by_email(pool, &email).await? {
        if existing.role != Role::Admin.as_str() {
            update_role(pool, existing.id, Role::Admin).await?;
            info!("Promoted existing user {email} to admin");
        }
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    let user = insert_user(&mut *tx, pepper, &email, &admin.password, Role::Admin).await?;
    insert_profile(
        &mut *tx,
        user.id,
        &NewProfile {
            full_name: "Administrator".to_string(),
            ..Default::default()
        },
    )
    .await?;
    tx.commit().await?;

    info!("Created bootstrap admin account {email}");
    Ok(())
}
