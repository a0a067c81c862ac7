// Profiles: the signed-in user's own profile, certificates and the
// completeness report shown on the profile page.

pub mod certificates;
pub mod completeness;
pub mod handlers;
pub mod repository;
