use serde::{Deserialize, Serialize};

use crate::models::profile::ProfileRow;
use crate::models::user::Role;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub score: f64,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub missing_sections: Vec<String>,
}

const STUDENT_WEIGHTS: &[(&str, f64)] = &[
    ("identity", 0.20),
    ("education", 0.25),
    ("skills", 0.25),
    ("summary", 0.15),
    ("certificates", 0.10),
    ("contact", 0.05),
];

const EMPLOYER_WEIGHTS: &[(&str, f64)] = &[
    ("identity", 0.25),
    ("company", 0.35),
    ("summary", 0.25),
    ("contact", 0.15),
];

/// Students list at least this many skills for a full skills score.
const TARGET_SKILLS: usize = 3;

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Each check is (passed, recommendation shown when it did not).
fn section_checks(
    section: &str,
    profile: &ProfileRow,
    certificate_count: usize,
) -> Vec<(bool, String)> {
    match section {
        "identity" => vec![
            (
                !profile.full_name.trim().is_empty(),
                "Add your full name".to_string(),
            ),
            (
                filled(&profile.headline),
                "Add a one-line headline describing what you do".to_string(),
            ),
            (
                filled(&profile.avatar_url),
                "Upload a profile photo".to_string(),
            ),
        ],
        "education" => vec![
            (
                filled(&profile.institution),
                "Add the institution you attend".to_string(),
            ),
            (
                filled(&profile.field_of_study),
                "Add your field of study".to_string(),
            ),
            (
                profile.graduation_year.is_some(),
                "Add your expected graduation year".to_string(),
            ),
        ],
        "skills" => {
            let skill_count = profile.skills.len().min(TARGET_SKILLS);
            let mut checks: Vec<(bool, String)> = (0..TARGET_SKILLS)
                .map(|i| {
                    (
                        i < skill_count,
                        format!("List at least {TARGET_SKILLS} skills to improve job matches"),
                    )
                })
                .collect();
            checks.push((
                !profile.interests.is_empty(),
                "Add the industries or roles you are interested in".to_string(),
            ));
            checks
        }
        "summary" => vec![
            (
                filled(&profile.bio),
                "Write a short bio about your goals".to_string(),
            ),
            (
                filled(&profile.location),
                "Add your location".to_string(),
            ),
        ],
        "certificates" => vec![(
            certificate_count > 0,
            "Add a certificate to back up your skills".to_string(),
        )],
        "company" => vec![
            (
                filled(&profile.company_name),
                "Add your company name".to_string(),
            ),
            (
                filled(&profile.headline),
                "Add a headline describing your company".to_string(),
            ),
            (
                filled(&profile.location),
                "Add your company location".to_string(),
            ),
        ],
        "contact" => vec![(
            filled(&profile.phone),
            "Add a contact phone number".to_string(),
        )],
        _ => vec![],
    }
}

pub fn compute_profile_completeness(
    profile: &ProfileRow,
    role: Role,
    certificate_count: usize,
) -> CompletenessReport {
    let weights = match role {
        Role::Employer => EMPLOYER_WEIGHTS,
        Role::Student | Role::Admin => STUDENT_WEIGHTS,
    };

    let mut sections = Vec::new();
    let mut missing_sections = Vec::new();
    let mut weighted_score_sum = 0.0;

    for (section_key, weight) in weights {
        let checks = section_checks(section_key, profile, certificate_count);
        let passed = checks.iter().filter(|(ok, _)| *ok).count();
        let score = if checks.is_empty() {
            0.0
        } else {
            passed as f64 / checks.len() as f64
        };

        let status = match score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            s if s > 0.0 => SectionStatus::Weak,
            _ => SectionStatus::Missing,
        };
        if status == SectionStatus::Missing {
            missing_sections.push(section_key.to_string());
        }

        let mut recommendations: Vec<String> = Vec::new();
        for (ok, rec) in checks {
            if !ok && !recommendations.contains(&rec) {
                recommendations.push(rec);
            }
        }

        weighted_score_sum += score * weight;
        sections.push(SectionHealth {
            section: section_key.to_string(),
            score,
            status,
            recommendations,
        });
    }

    let total_weight: f64 = weights.iter().map(|(_, w)| w).sum();
    let overall_score = if total_weight > 0.0 {
        (weighted_score_sum / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    CompletenessReport {
        overall_score,
        sections,
        missing_sections,
    }
}
