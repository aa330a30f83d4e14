//! Enterprise listings: lookup by id, category filtering, registration and
//! maintenance on top of [`crate::repository::DocumentRepository`].

pub mod service;

pub use service::EnterpriseService;
