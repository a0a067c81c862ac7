//! Demo catalog used to populate an empty database.
//!
//! Each table is seeded only when it has no rows, so restarting with
//! `SEED_SAMPLE_DATA=true` never duplicates data.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobType;
use crate::models::partner::PartnerType;
use crate::models::resource::ResourceType;

pub struct SampleJob {
    pub title: &'static str,
    pub company: &'static str,
    pub location: &'static str,
    pub job_type: JobType,
    pub remote: bool,
    pub description: &'static str,
    pub requirements: &'static [&'static str],
    pub tags: &'static [&'static str],
    pub salary_range: Option<&'static str>,
    /// (year, month, day)
    pub deadline: Option<(i32, u32, u32)>,
}

pub struct SampleResource {
    pub title: &'static str,
    pub description: &'static str,
    pub resource_type: ResourceType,
    pub url: &'static str,
    pub tags: &'static [&'static str],
    pub author: Option<&'static str>,
}

pub struct SamplePartner {
    pub name: &'static str,
    pub description: &'static str,
    pub website: &'static str,
    pub partner_type: PartnerType,
}

pub const SAMPLE_JOBS: &[SampleJob] = &[
    SampleJob {
        title: "Software Engineering Intern",
        company: "Safari Labs",
        location: "Nairobi",
        job_type: JobType::Internship,
        remote: false,
        description: "Join the platform team building payment APIs used by small businesses across East Africa.",
        requirements: &["rust", "sql", "git"],
        tags: &["engineering", "backend", "fintech"],
        salary_range: Some("KES 30,000 - 45,000"),
        deadline: Some((2027, 1, 31)),
    },
    SampleJob {
        title: "Junior Data Analyst",
        company: "Mavuno Insights",
        location: "Kisumu",
        job_type: JobType::FullTime,
        remote: true,
        description: "Turn agricultural survey data into dashboards that help co-operatives plan harvests.",
        requirements: &["sql", "excel", "statistics"],
        tags: &["data", "agritech"],
        salary_range: Some("KES 60,000 - 80,000"),
        deadline: None,
    },
    SampleJob {
        title: "Marketing Attachment",
        company: "Kijani Foods",
        location: "Nakuru",
        job_type: JobType::Attachment,
        remote: false,
        description: "Support product launches, social media campaigns and market research for a growing food brand.",
        requirements: &["communication", "social media"],
        tags: &["marketing", "fmcg"],
        salary_range: None,
        deadline: Some((2026, 12, 15)),
    },
    SampleJob {
        title: "Part-time UX Research Assistant",
        company: "Safari Labs",
        location: "Nairobi",
        job_type: JobType::PartTime,
        remote: true,
        description: "Run usability interviews with merchants and synthesise findings for the design team.",
        requirements: &["user research", "figma"],
        tags: &["design", "research"],
        salary_range: Some("KES 1,500 / hour"),
        deadline: None,
    },
    SampleJob {
        title: "Community Health Volunteer Coordinator",
        company: "Afya Mashinani",
        location: "Machakos",
        job_type: JobType::Volunteer,
        remote: false,
        description: "Coordinate volunteer schedules and record community outreach visits.",
        requirements: &["organisation", "excel"],
        tags: &["health", "community"],
        salary_range: None,
        deadline: None,
    },
    SampleJob {
        title: "Accounting Intern",
        company: "Mombasa Port Logistics",
        location: "Mombasa",
        job_type: JobType::Internship,
        remote: false,
        description: "Assist the finance team with reconciliations, invoicing and month-end reporting.",
        requirements: &["accounting", "excel"],
        tags: &["finance", "logistics"],
        salary_range: Some("KES 25,000"),
        deadline: Some((2027, 2, 28)),
    },
];

pub const SAMPLE_RESOURCES: &[SampleResource] = &[
    SampleResource {
        title: "Writing a CV That Gets Read",
        description: "A step-by-step guide to structuring a one-page CV for internship applications.",
        resource_type: ResourceType::Guide,
        url: "https://inuastude.example/resources/cv-guide",
        tags: &["cv", "applications"],
        author: Some("Inua Stude Careers Team"),
    },
    SampleResource {
        title: "Cover Letter Template",
        description: "An editable cover letter template with annotated examples.",
        resource_type: ResourceType::Template,
        url: "https://inuastude.example/resources/cover-letter-template",
        tags: &["applications", "writing"],
        author: None,
    },
    SampleResource {
        title: "Acing the Technical Interview",
        description: "Video walkthrough of common coding interview questions and how to talk through them.",
        resource_type: ResourceType::Video,
        url: "https://inuastude.example/resources/technical-interview",
        tags: &["interviews", "engineering"],
        author: Some("Safari Labs"),
    },
    SampleResource {
        title: "Introduction to SQL",
        description: "A free self-paced course covering queries, joins and aggregation.",
        resource_type: ResourceType::Course,
        url: "https://inuastude.example/resources/intro-sql",
        tags: &["data", "sql"],
        author: Some("Mavuno Insights"),
    },
    SampleResource {
        title: "Networking for Introverts",
        description: "Practical advice on building professional relationships at career fairs and online.",
        resource_type: ResourceType::Article,
        url: "https://inuastude.example/resources/networking",
        tags: &["networking", "soft skills"],
        author: None,
    },
];

pub const SAMPLE_PARTNERS: &[SamplePartner] = &[
    SamplePartner {
        name: "Safari Labs",
        description: "Payments infrastructure for small businesses.",
        website: "https://safarilabs.example",
        partner_type: PartnerType::Employer,
    },
    SamplePartner {
        name: "University of Nairobi Career Office",
        description: "Career services for UoN students and alumni.",
        website: "https://careers.uon.example",
        partner_type: PartnerType::University,
    },
    SamplePartner {
        name: "Afya Mashinani",
        description: "Community health outreach across rural counties.",
        website: "https://afya.example",
        partner_type: PartnerType::Ngo,
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

async fn table_is_empty(pool: &PgPool, table: &str) -> Result<bool, AppError> {
    // table names come from the fixed list in seed_sample_data, never from input
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count == 0)
}

/// Seeds partners, job postings and resources into empty tables.
pub async fn seed_sample_data(pool: &PgPool) -> Result<(), AppError> {
    if table_is_empty(pool, "partners").await? {
        for p in SAMPLE_PARTNERS {
            sqlx::query(
                r#"
                INSERT INTO partners (id, name, description, website, partner_type)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(p.name)
            .bind(p.description)
            .bind(p.website)
            .bind(p.partner_type.as_str())
            .execute(pool)
            .await?;
        }
        info!("Seeded {} sample partners", SAMPLE_PARTNERS.len());
    }

    if table_is_empty(pool, "job_postings").await? {
        for job in SAMPLE_JOBS {
            let deadline = job
                .deadline
                .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
            sqlx::query(
                r#"
                INSERT INTO job_postings
                    (id, title, company, location, job_type, remote, description,
                     requirements, tags, salary_range, deadline)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(job.title)
            .bind(job.company)
            .bind(job.location)
            .bind(job.job_type.as_str())
            .bind(job.remote)
            .bind(job.description)
            .bind(owned(job.requirements))
            .bind(owned(job.tags))
            .bind(job.salary_range)
            .bind(deadline)
            .execute(pool)
            .await?;
        }
        info!("Seeded {} sample job postings", SAMPLE_JOBS.len());
    }

    if table_is_empty(pool, "resources").await? {
        for r in SAMPLE_RESOURCES {
            sqlx::query(
                r#"
                INSERT INTO resources (id, title, description, resource_type, url, tags, author)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(r.title)
            .bind(r.description)
            .bind(r.resource_type.as_str())
            .bind(r.url)
            .bind(owned(r.tags))
            .bind(r.author)
            .execute(pool)
            .await?;
        }
        info!("Seeded {} sample resources", SAMPLE_RESOURCES.len());
    }

    Ok(())
}
