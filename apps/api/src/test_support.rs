// Fixtures for tests that need a live Postgres. Those tests are `#[ignore]`d
// and additionally skip when TEST_DATABASE_URL is unset.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::users::insert_user;
use crate::db::run_migrations;
use crate::jobs::repository::{create_job, JobInput};
use crate::models::job::JobPostingRow;
use crate::models::user::Role;

pub async fn test_pool() -> Option<PgPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping: TEST_DATABASE_URL not set");
            return None;
        }
    };
    let pool = PgPool::connect(&url).await.expect("connect test database");
    run_migrations(&pool).await.expect("apply migrations");
    Some(pool)
}

pub async fn seed_user(pool: &PgPool, role: Role) -> Uuid {
    let email = format!("{}-{}@test.inua", role, Uuid::new_v4());
    insert_user(pool, "test-pepper", &email, "password123", role)
        .await
        .expect("insert user")
        .id
}

pub fn job_input(partner_id: Option<Uuid>) -> JobInput {
    let mut input: JobInput = serde_json::from_value(json!({
        "title": "Data Intern",
        "company": "Mavuno Analytics",
        "location": "Kisumu",
        "job_type": "internship",
        "description": "Build dashboards for smallholder farmers",
        "tags": ["data", "python"]
    }))
    .expect("job input fixture");
    input.partner_id = partner_id;
    input
}

pub async fn seed_job(pool: &PgPool, employer_id: Uuid) -> JobPostingRow {
    create_job(pool, employer_id, &job_input(None))
        .await
        .expect("insert job")
}
