use mongodb::bson::oid::ObjectId;

use crate::errors::ModelError;

/// Trim `raw` and parse it as a 24-character hexadecimal ObjectId.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, ModelError> {
    let trimmed = raw.trim();
    ObjectId::parse_str(trimmed).map_err(|_| ModelError::InvalidId(trimmed.to_string()))
}
