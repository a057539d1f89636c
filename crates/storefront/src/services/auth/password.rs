//! Credential hashing.
//!
//! New secrets are stored as Argon2id PHC strings. Directory entries written
//! before hashing was introduced hold the plaintext secret; those still verify
//! (as [`Verification::Legacy`]) so the caller can upgrade them.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::HashingConfig;

use super::AuthError;

/// Result of checking a password against a stored secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Matched a hashed secret.
    Verified,
    /// Matched a plaintext secret that should be re-hashed.
    Legacy,
    /// Did not match.
    Mismatch,
}

impl Verification {
    #[must_use]
    pub const fn is_match(self) -> bool {
        !matches!(self, Self::Mismatch)
    }
}

/// Hashes and verifies credential secrets.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Build a hasher from cost parameters.
    ///
    /// # Errors
    ///
    /// Returns the argon2 error if the parameters are out of range.
    pub fn new(config: &HashingConfig) -> Result<Self, argon2::Error> {
        let params =
            Params::new(config.memory_kib, config.iterations, Params::DEFAULT_P_COST, None)?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    /// Check a password against a stored secret.
    #[must_use]
    pub fn verify(&self, password: &str, stored: &str) -> Verification {
        match PasswordHash::new(stored) {
            Ok(parsed) => {
                if self
                    .argon2()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
                {
                    Verification::Verified
                } else {
                    Verification::Mismatch
                }
            }
            Err(_) if stored == password => Verification::Legacy,
            Err(_) => Verification::Mismatch,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(&HashingConfig::minimal()).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = hasher();
        let stored = hasher.hash("password123").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert_eq!(hasher.verify("password123", &stored), Verification::Verified);
        assert_eq!(hasher.verify("password124", &stored), Verification::Mismatch);
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn test_plaintext_secret_is_legacy() {
        let hasher = hasher();
        assert_eq!(hasher.verify("admin123", "admin123"), Verification::Legacy);
        assert_eq!(hasher.verify("admin124", "admin123"), Verification::Mismatch);
        assert!(!Verification::Mismatch.is_match());
    }

    #[test]
    fn test_rejects_invalid_params() {
        let config = HashingConfig {
            memory_kib: 1,
            iterations: 0,
        };
        let err = CredentialHasher::new(&config).unwrap_err();
        assert!(matches!(
            err,
            argon2::Error::MemoryTooLittle | argon2::Error::TimeTooSmall
        ));
    }
}
