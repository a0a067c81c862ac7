// Job applications: students apply and withdraw, employers review.

pub mod handlers;
pub mod repository;
