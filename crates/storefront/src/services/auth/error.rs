//! Authentication error types.

use thiserror::Error;

use eliteshop_core::Email;

use crate::store::StoreError;

/// Malformed sign-in or sign-up input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Email or password left blank on sign-in.
    #[error("email and password are required")]
    MissingCredentials,

    /// A sign-up field left blank.
    #[error("all fields are required")]
    MissingFields,

    /// Email without an @ symbol.
    #[error("please enter a valid email address")]
    InvalidEmail,

    /// Password shorter than the minimum for the operation.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length in characters.
        min: usize,
    },

    /// Display name shorter than the minimum.
    #[error("name must be at least {min} characters")]
    NameTooShort {
        /// Minimum length in characters.
        min: usize,
    },
}

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input rejected before touching the directory.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No directory entry for the email.
    #[error("no account with this email; sign up first")]
    NotFound,

    /// Email known but secret does not match.
    #[error("invalid password, please try again")]
    InvalidCredential,

    /// Email already registered.
    #[error("an account with this email already exists; sign in instead")]
    Conflict,

    /// Sign-in attempted while a session exists and the policy forbids it.
    #[error("already signed in as {0}; sign out first")]
    AlreadyAuthenticated(Email),

    /// Storage read or write failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether the error is an expected outcome of user input rather than a
    /// system fault.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::PasswordHash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            AuthError::NotFound.to_string(),
            "no account with this email; sign up first"
        );
        assert_eq!(
            AuthError::from(ValidationError::PasswordTooShort { min: 6 }).to_string(),
            "password must be at least 6 characters"
        );
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(AuthError::Conflict.is_user_facing());
        assert!(AuthError::InvalidCredential.is_user_facing());
        assert!(!AuthError::PasswordHash.is_user_facing());
    }
}
