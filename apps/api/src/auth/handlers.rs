use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::auth::extractor::AuthUser;
use crate::auth::password::{verify_dummy_password, verify_password};
use crate::auth::session::{create_session, delete_session, purge_expired_sessions};
use crate::auth::users::{find_by_email, find_by_id, insert_user, normalize_email};
use crate::catalog::normalize_list;
use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::models::user::{Role, User};
use crate::profiles::repository::{get_profile, insert_profile, NewProfile};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Sign-up wizard payload: account fields plus the first profile fields.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be between 8 and 128 characters"))]
    pub password: String,
    pub role: Role,
    #[validate(length(min = 1, max = 120, message = "must be between 1 and 120 characters"))]
    pub full_name: String,
    pub institution: Option<String>,
    pub field_of_study: Option<String>,
    #[validate(range(min = 1950, max = 2100, message = "must be a plausible year"))]
    pub graduation_year: Option<i32>,
    pub company_name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
    pub profile: Option<ProfileRow>,
}

impl SignupRequest {
    fn check_role_fields(&self) -> Result<(), AppError> {
        if self.full_name.trim().is_empty() {
            return Err(AppError::Validation("full_name: is required".to_string()));
        }
        match self.role {
            Role::Admin => Err(AppError::Validation(
                "role: admin accounts cannot be self-registered".to_string(),
            )),
            Role::Employer
                if self
                    .company_name
                    .as_deref()
                    .map_or(true, |c| c.trim().is_empty()) =>
            {
                Err(AppError::Validation(
                    "company_name: is required for employer accounts".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    fn to_new_profile(&self) -> NewProfile {
        NewProfile {
            full_name: self.full_name.trim().to_string(),
            institution: self.institution.clone(),
            field_of_study: self.field_of_study.clone(),
            graduation_year: self.graduation_year,
            company_name: self.company_name.clone(),
            skills: normalize_list(&self.skills),
            interests: normalize_list(&self.interests),
        }
    }
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    req.validate()?;
    req.check_role_fields()?;

    let email = normalize_email(&req.email);
    if find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::Conflict(format!("An account for {email} already exists")));
    }

    let mut tx = state.db.begin().await?;
    let user = insert_user(
        &mut *tx,
        &state.config.password_pepper,
        &email,
        &req.password,
        req.role,
    )
    .await?;
    insert_profile(&mut *tx, user.id, &req.to_new_profile()).await?;
    tx.commit().await?;

    info!("Registered {} account {}", req.role, user.id);

    let session = create_session(&state.db, user.id, state.config.session_ttl_hours).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token: session.token,
            expires_at: session.expires_at,
            user: user.into(),
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    req.validate()?;

    let email = normalize_email(&req.email);
    let Some(user) = find_by_email(&state.db, &email).await? else {
        verify_dummy_password(&state.config.password_pepper, &req.password)?;
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    let valid = verify_password(
        &state.config.password_pepper,
        &user.password_salt,
        &req.password,
        &user.password_hash,
    )?;
    if !valid {
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let session = create_session(&state.db, user.id, state.config.session_ttl_hours).await?;
    info!("User {} logged in", user.id);

    Ok(Json(SessionResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: user.into(),
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    delete_session(&state.db, &auth.token_hash).await?;
    purge_expired_sessions(&state.db).await?;
    info!("User {} logged out", auth.email);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let profile = get_profile(&state.db, auth.id).await?;
    let user = find_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(AppError::unauthenticated)?;
    Ok(Json(MeResponse {
        user: user.into(),
        profile,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(role: Role, company: Option<&str>) -> SignupRequest {
        SignupRequest {
            email: "wanjiku@example.com".to_string(),
            password: "correct horse battery".to_string(),
            role,
            full_name: "Wanjiku Kamau".to_string(),
            institution: Some("University of Nairobi".to_string()),
            field_of_study: None,
            graduation_year: Some(2027),
            company_name: company.map(String::from),
            skills: vec!["Rust".to_string(), " rust ".to_string(), "SQL".to_string()],
            interests: vec![],
        }
    }

    #[test]
    fn test_valid_student_signup_passes() {
        let req = signup(Role::Student, None);
        assert!(req.validate().is_ok());
        assert!(req.check_role_fields().is_ok());
    }

    #[test]
    fn test_admin_signup_rejected() {
        let req = signup(Role::Admin, None);
        assert!(matches!(req.check_role_fields(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_employer_requires_company() {
        assert!(signup(Role::Employer, None).check_role_fields().is_err());
        assert!(signup(Role::Employer, Some("  ")).check_role_fields().is_err());
        assert!(signup(Role::Employer, Some("Safari Labs")).check_role_fields().is_ok());
    }

    #[test]
    fn test_short_password_and_bad_email_fail_validation() {
        let mut req = signup(Role::Student, None);
        req.password = "short".to_string();
        req.email = "not-an-email".to_string();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("email"));
    }

    #[test]
    fn test_profile_lists_are_normalized() {
        let profile = signup(Role::Student, None).to_new_profile();
        assert_eq!(profile.skills, vec!["Rust".to_string(), "SQL".to_string()]);
    }
}
