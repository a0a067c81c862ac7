// Learning resources: public filtered listing, admin-managed content.

pub mod handlers;
pub mod repository;
