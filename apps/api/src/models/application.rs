use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Shortlisted,
    Rejected,
    Accepted,
}

text_enum!(ApplicationStatus {
    Pending => "pending",
    Reviewed => "reviewed",
    Shortlisted => "shortlisted",
    Rejected => "rejected",
    Accepted => "accepted",
});

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Accepted)
    }

    /// Review only moves forward; a decision is final.
    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (Pending, Reviewed | Shortlisted | Rejected | Accepted) => true,
            (Reviewed, Shortlisted | Rejected | Accepted) => true,
            (Shortlisted, Rejected | Accepted) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application joined with the posting it targets, for the applicant's list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationWithJobRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub company: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application joined with the applicant's name, for the employer's list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantRow {
    pub id: Uuid,
    pub applicant_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::ApplicationStatus::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(Pending.can_transition_to(Reviewed));
        assert!(Pending.can_transition_to(Accepted));
        assert!(Reviewed.can_transition_to(Shortlisted));
        assert!(Shortlisted.can_transition_to(Rejected));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!Reviewed.can_transition_to(Pending));
        assert!(!Shortlisted.can_transition_to(Reviewed));
    }

    #[test]
    fn test_decisions_are_terminal() {
        assert!(Accepted.is_terminal());
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Shortlisted));
    }

    #[test]
    fn test_same_status_is_noop() {
        assert!(Accepted.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Pending));
    }
}
