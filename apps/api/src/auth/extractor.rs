//! `AuthUser` gates protected routes: handlers that take it as an argument
//! reject requests without a live bearer session before running.

use anyhow::anyhow;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth::password::hash_session_token;
use crate::auth::session::find_session_user;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub token_hash: String,
}

impl AuthUser {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(AppError::unauthenticated)?;
        let token_hash = hash_session_token(token);

        let user = find_session_user(&state.db, &token_hash)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Session is invalid or expired".to_string()))?;

        let role = Role::parse(&user.role)
            .ok_or_else(|| AppError::Internal(anyhow!("user {} has unknown role '{}'", user.id, user.role)))?;

        Ok(AuthUser {
            id: user.id,
            email: user.email,
            role,
            token_hash,
        })
    }
}
