use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("El formato del ID '{0}' no es válido.")]
    InvalidId(String),
    #[error("{0}")]
    Validation(String),
}
