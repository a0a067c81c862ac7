use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;
use crate::catalog::filter::Facetable;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Attachment,
    Volunteer,
}

text_enum!(JobType {
    FullTime => "full_time",
    PartTime => "part_time",
    Internship => "internship",
    Attachment => "attachment",
    Volunteer => "volunteer",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub employer_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub remote: bool,
    pub description: String,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
    pub salary_range: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPostingRow {
    /// Open for applications on `today`.
    pub fn accepts_applications(&self, today: NaiveDate) -> bool {
        self.is_active && self.deadline.map_or(true, |d| d >= today)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.employer_id == Some(user_id)
    }
}

impl Facetable for JobPostingRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.company.as_str(),
            self.location.as_str(),
            self.description.as_str(),
        ]
    }

    fn kind(&self) -> &str {
        &self.job_type
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::filter::{build_listing, ListingQuery};

    fn job(is_active: bool, deadline: Option<NaiveDate>) -> JobPostingRow {
        JobPostingRow {
            id: Uuid::new_v4(),
            employer_id: None,
            partner_id: None,
            title: "Intern".to_string(),
            company: "Acme".to_string(),
            location: "Nairobi".to_string(),
            job_type: "internship".to_string(),
            remote: false,
            description: "Learn things".to_string(),
            requirements: vec![],
            tags: vec![],
            salary_range: None,
            deadline,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_deadline_day_is_still_open() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(job(true, Some(today)).accepts_applications(today));
        assert!(job(true, None).accepts_applications(today));
    }

    #[test]
    fn test_past_deadline_or_inactive_is_closed() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 2, 28).unwrap();
        assert!(!job(true, Some(yesterday)).accepts_applications(today));
        assert!(!job(false, None).accepts_applications(today));
    }

    fn listed(jobs: &[JobPostingRow], search: &str) -> Vec<String> {
        let query = ListingQuery {
            search: Some(search.to_string()),
            ..Default::default()
        };
        build_listing(jobs, &query)
            .unwrap()
            .page
            .items
            .iter()
            .map(|j| j.title.clone())
            .collect()
    }

    #[test]
    fn test_search_covers_title_company_location_and_description() {
        let mut a = job(true, None);
        a.title = "Software Intern".to_string();
        let mut b = job(true, None);
        b.title = "Accounts Clerk".to_string();
        b.company = "Safari Ledger".to_string();
        b.location = "Mombasa".to_string();
        b.description = "Reconcile M-Pesa statements".to_string();
        let jobs = vec![a, b];

        assert_eq!(listed(&jobs, "software"), vec!["Software Intern"]);
        assert_eq!(listed(&jobs, "LEDGER"), vec!["Accounts Clerk"]);
        assert_eq!(listed(&jobs, "mombasa"), vec!["Accounts Clerk"]);
        assert_eq!(listed(&jobs, "m-pesa"), vec!["Accounts Clerk"]);
        assert_eq!(listed(&jobs, "nairobi"), vec!["Software Intern"]);
        assert!(listed(&jobs, "salary").is_empty());
    }

    #[test]
    fn test_job_type_parse() {
        assert_eq!(JobType::parse("part_time"), Some(JobType::PartTime));
        assert_eq!(JobType::parse("Part Time"), None);
    }
}
