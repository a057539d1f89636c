//! Account directory entries and the session view derived from them.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::AccountId;

/// A registered account as stored in the directory.
///
/// `password` holds the stored credential secret (a PHC-format hash for
/// accounts written by this crate). Implements `Debug` manually to redact it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub password: String,
    pub avatar: String,
}

impl UserAccount {
    /// The non-secret view of this account.
    #[must_use]
    pub fn session(&self) -> Session {
        Session {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }

    /// Directory listing entry (no id, no secret).
    #[must_use]
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("avatar", &self.avatar)
            .finish()
    }
}

/// The signed-in user as seen by the rest of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: AccountId,
    pub name: String,
    pub email: Email,
    pub avatar: String,
}

/// Public listing entry for a registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub email: Email,
    pub name: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount {
            id: AccountId::new("1"),
            name: "John Doe".to_string(),
            email: Email::parse("john@example.com").unwrap(),
            password: "super-secret-hash".to_string(),
            avatar: "https://img.example/john.jpg".to_string(),
        }
    }

    #[test]
    fn test_session_has_no_password_field() {
        let value = serde_json::to_value(account().session()).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("password"));
        assert_eq!(object.len(), 4);
        assert_eq!(object["email"], "john@example.com");
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", account());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret-hash"));
    }

    #[test]
    fn test_summary() {
        let summary = account().summary();
        assert_eq!(summary.name, "John Doe");
        assert_eq!(summary.email.as_str(), "john@example.com");
    }
}
