//! Document types stored in MongoDB and the helpers that validate them.

pub mod category;
pub mod db;
pub mod enterprise;
pub mod errors;
pub mod object_id;

pub use mongodb::bson;
