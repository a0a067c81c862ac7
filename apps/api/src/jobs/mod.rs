// Job postings: public listing and detail, employer management and
// profile-based recommendations.

pub mod handlers;
pub mod repository;
