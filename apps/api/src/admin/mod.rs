// Admin dashboard (stats, user roles) and the employer headcount reports.

pub mod handlers;
pub mod headcount;
pub mod stats;
