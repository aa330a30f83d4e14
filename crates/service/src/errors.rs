use thiserror::Error;

/// Transport-independent classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

/// Errors returned by the service layer. The message is safe to show to
/// callers; store causes are logged where they are converted, not carried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ServiceError::BadRequest(_) => FailureKind::BadRequest,
            ServiceError::NotFound(_) => FailureKind::NotFound,
            ServiceError::Conflict(_) => FailureKind::Conflict,
            ServiceError::Internal(_) => FailureKind::Internal,
        }
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        ServiceError::BadRequest(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn model_errors_are_bad_requests() {
        let e: ServiceError = ModelError::InvalidId("x".into()).into();
        assert_eq!(e.kind(), FailureKind::BadRequest);
        assert_eq!(e.to_string(), "El formato del ID 'x' no es válido.");
        let e: ServiceError = ModelError::Validation("campo".into()).into();
        assert_eq!(e, ServiceError::BadRequest("campo".into()));
    }
}
