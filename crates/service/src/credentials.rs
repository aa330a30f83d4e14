//! Credential hashing for registered enterprises. Only the argon2 PHC string
//! is ever stored.

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::errors::ServiceError;

pub fn hash_credential(plain: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "credential hashing failed");
            ServiceError::Internal("Error al procesar la contraseña.".into())
        })
}

/// Check `plain` against a stored PHC string. Nothing logs in yet, so only
/// tests read hashes back.
#[cfg(test)]
pub fn verify_credential(plain: &str, hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};

    PasswordHash::new(hash)
        .map(|parsed| Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let a = hash_credential("Passw0rd!").unwrap();
        let b = hash_credential("Passw0rd!").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
        assert!(verify_credential("Passw0rd!", &a));
        assert!(!verify_credential("wrong", &a));
        assert!(!verify_credential("Passw0rd!", "not-a-phc-string"));
    }
}
