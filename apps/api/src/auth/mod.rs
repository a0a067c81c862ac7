// Authentication: email/password accounts, bearer sessions, role guards.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod session;
pub mod users;

pub use extractor::AuthUser;
