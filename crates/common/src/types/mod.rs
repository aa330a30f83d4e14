use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "ok";
pub const STATUS_ERROR: &str = "error";

/// Result of probing the API process and its backing store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub api_status: String,
    pub database_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HealthReport {
    pub fn healthy() -> Self {
        Self { api_status: STATUS_OK.into(), database_status: STATUS_OK.into(), reason: None }
    }

    pub fn database_down(reason: impl Into<String>) -> Self {
        Self {
            api_status: STATUS_OK.into(),
            database_status: STATUS_ERROR.into(),
            reason: Some(reason.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.database_status == STATUS_OK
    }
}

/// Payload of the welcome endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Welcome {
    pub message: String,
}
