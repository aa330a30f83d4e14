//! Service layer for the enterprise directory.
//! - `store`: the document store seam (MongoDB and in-memory).
//! - `repository`: the collection wrapper that owns id validation and
//!   store-error translation.
//! - `enterprise`: listing, registration and maintenance of enterprises.

pub mod credentials;
pub mod enterprise;
pub mod errors;
pub mod health;
pub mod repository;
pub mod store;

pub use enterprise::EnterpriseService;
pub use errors::{FailureKind, ServiceError};
