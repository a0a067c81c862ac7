use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ensure_not_blank, AppError};
use crate::models::partner::{PartnerRow, PartnerType};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PartnerInput {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub logo_url: Option<String>,
    #[validate(url(message = "must be a valid URL"))]
    pub website: Option<String>,
    pub partner_type: PartnerType,
}

impl PartnerInput {
    pub fn check_not_blank(&self) -> Result<(), AppError> {
        ensure_not_blank(&[("name", self.name.as_str())])
    }
}

pub async fn list_partners(pool: &PgPool) -> Result<Vec<PartnerRow>, AppError> {
    Ok(
        sqlx::query_as::<_, PartnerRow>("SELECT * FROM partners ORDER BY name ASC")
            .fetch_all(pool)
            .await?,
    )
}

pub async fn get_partner(pool: &PgPool, id: Uuid) -> Result<Option<PartnerRow>, AppError> {
    Ok(
        sqlx::query_as::<_, PartnerRow>("SELECT * FROM partners WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn create_partner(pool: &PgPool, input: &PartnerInput) -> Result<PartnerRow, AppError> {
    Ok(sqlx::query_as::<_, PartnerRow>(
        r#"
        INSERT INTO partners (id, name, description, logo_url, website, partner_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(input.name.trim())
    .bind(input.description.as_deref())
    .bind(input.logo_url.as_deref())
    .bind(input.website.as_deref())
    .bind(input.partner_type.as_str())
    .fetch_one(pool)
    .await?)
}

pub async fn update_partner(
    pool: &PgPool,
    id: Uuid,
    input: &PartnerInput,
) -> Result<PartnerRow, AppError> {
    sqlx::query_as::<_, PartnerRow>(
        r#"
        UPDATE partners SET
            name = $2, description = $3, logo_url = $4, website = $5, partner_type = $6
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.name.trim())
    .bind(input.description.as_deref())
    .bind(input.logo_url.as_deref())
    .bind(input.website.as_deref())
    .bind(input.partner_type.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Partner {id} not found")))
}

pub async fn delete_partner(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM partners WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Partner {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partner_input_parses_type() {
        let input: PartnerInput = serde_json::from_value(json!({
            "name": "Strathmore University",
            "partner_type": "university",
            "website": "https://strathmore.edu"
        }))
        .unwrap();
        assert_eq!(input.partner_type, PartnerType::University);
        assert!(input.validate().is_ok());
        assert!(input.check_not_blank().is_ok());
    }

    #[test]
    fn test_unknown_partner_type_is_rejected_by_serde() {
        let parsed = serde_json::from_value::<PartnerInput>(json!({
            "name": "Acme", "partner_type": "sponsor"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_whitespace_name_is_rejected() {
        let input: PartnerInput = serde_json::from_value(json!({
            "name": "  ",
            "partner_type": "ngo"
        }))
        .unwrap();
        assert!(input.validate().is_ok());
        assert!(matches!(input.check_not_blank(), Err(AppError::Validation(m)) if m.starts_with("name")));
    }

    #[test]
    fn test_bad_logo_url_fails_validation() {
        let input: PartnerInput = serde_json::from_value(json!({
            "name": "Acme",
            "partner_type": "employer",
            "logo_url": "logo.png"
        }))
        .unwrap();
        assert!(input.validate().unwrap_err().field_errors().contains_key("logo_url"));
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a disposable Postgres"]
    async fn test_partner_lifecycle() {
        let Some(pool) = crate::test_support::test_pool().await else { return };
        let input: PartnerInput = serde_json::from_value(json!({
            "name": "  Kenya Red Cross ",
            "partner_type": "ngo"
        }))
        .unwrap();
        let created = create_partner(&pool, &input).await.unwrap();
        assert_eq!(created.name, "Kenya Red Cross");
        assert_eq!(created.partner_type, "ngo");

        let renamed = PartnerInput {
            name: "KRCS".to_string(),
            partner_type: PartnerType::Government,
            ..input
        };
        let updated = update_partner(&pool, created.id, &renamed).await.unwrap();
        assert_eq!(updated.name, "KRCS");
        assert_eq!(updated.partner_type, "government");

        delete_partner(&pool, created.id).await.unwrap();
        assert!(get_partner(&pool, created.id).await.unwrap().is_none());
        assert!(matches!(
            delete_partner(&pool, created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            update_partner(&pool, created.id, &renamed).await,
            Err(AppError::NotFound(_))
        ));
    }
}
