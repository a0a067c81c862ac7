//! Match scoring — pluggable, trait-based scorer that measures a student
//! profile against a job posting.
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`; the default backend is
//! `KeywordMatchScorer`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::JobPostingRow;
use crate::models::profile::ProfileRow;

const TAG_WEIGHT: f32 = 1.0;
const REQUIREMENT_WEIGHT: f32 = 0.7;

const SKILL_STRENGTH: f32 = 1.0;
const INTEREST_STRENGTH: f32 = 0.8;
const MENTION_STRENGTH: f32 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// A job keyword and how well the profile covers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub evidence: String, // which profile field covers it
    pub strength: f32,    // 0.0 – 1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub overall_score: u32,              // 0 – 100
    pub strong_matches: Vec<KeywordMatch>, // strength ≥ 0.8
    pub partial_matches: Vec<KeywordMatch>, // 0.4 – 0.79
    pub gaps: Vec<String>,               // strength < 0.4
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching handlers.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, profile: &ProfileRow, job: &JobPostingRow)
        -> Result<MatchReport, AppError>;
}

/// Exact skill match → 1.0, interest match → 0.8, keyword mentioned in a
/// skill, interest, field of study or headline → 0.5, otherwise 0.
/// Tags weigh 1.0 and requirements 0.7; a keyword listed as both counts once
/// with the tag weight.
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(
        &self,
        profile: &ProfileRow,
        job: &JobPostingRow,
    ) -> Result<MatchReport, AppError> {
        Ok(compute_keyword_match(profile, job))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword match algorithm
// ────────────────────────────────────────────────────────────────────────────

fn job_keywords(job: &JobPostingRow) -> Vec<(String, f32)> {
    let mut keywords: Vec<(String, f32)> = Vec::new();
    let tagged = job.tags.iter().map(|t| (t, TAG_WEIGHT));
    let required = job.requirements.iter().map(|r| (r, REQUIREMENT_WEIGHT));

    for (raw, weight) in tagged.chain(required) {
        let kw = raw.trim().to_lowercase();
        if kw.is_empty() || keywords.iter().any(|(k, _)| *k == kw) {
            continue;
        }
        keywords.push((kw, weight));
    }
    keywords
}

fn best_strength(profile: &ProfileRow, keyword: &str) -> (f32, String) {
    if profile.skills.iter().any(|s| s.to_lowercase() == keyword) {
        return (SKILL_STRENGTH, "skills".to_string());
    }
    if profile.interests.iter().any(|i| i.to_lowercase() == keyword) {
        return (INTEREST_STRENGTH, "interests".to_string());
    }

    let mentions = [
        ("skills", profile.skills.join(" ")),
        ("interests", profile.interests.join(" ")),
        ("field_of_study", profile.field_of_study.clone().unwrap_or_default()),
        ("headline", profile.headline.clone().unwrap_or_default()),
    ];
    for (field, text) in mentions {
        if text.to_lowercase().contains(keyword) {
            return (MENTION_STRENGTH, field.to_string());
        }
    }
    (0.0, String::new())
}

pub fn compute_keyword_match(profile: &ProfileRow, job: &JobPostingRow) -> MatchReport {
    let keywords = job_keywords(job);

    let mut strong_matches = Vec::new();
    let mut partial_matches = Vec::new();
    let mut gaps = Vec::new();

    let mut total_weighted = 0.0_f32;
    let mut total_score = 0.0_f32;

    for (keyword, weight) in keywords {
        total_weighted += weight;
        let (strength, evidence) = best_strength(profile, &keyword);
        total_score += strength * weight;

        if strength >= 0.8 {
            strong_matches.push(KeywordMatch { keyword, evidence, strength });
        } else if strength >= 0.4 {
            partial_matches.push(KeywordMatch { keyword, evidence, strength });
        } else {
            gaps.push(keyword);
        }
    }

    let overall_score = if total_weighted > 0.0 {
        ((total_score / total_weighted) * 100.0).round() as u32
    } else {
        0
    };

    MatchReport {
        overall_score,
        strong_matches,
        partial_matches,
        gaps,
        scorer_backend: "keyword".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
