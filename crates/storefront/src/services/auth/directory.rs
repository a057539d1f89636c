//! Persisted account directory.
//!
//! The directory is a single record holding every registered account,
//! secrets included. It is seeded with demo accounts the first time it is
//! read and no record exists yet; an existing record, even an empty or
//! unreadable one, is never replaced by the seed.

use eliteshop_core::{AccountId, Email, UserAccount};

use crate::store::{self, KeyValueStore, StoreError, keys};

use super::AuthError;
use super::password::CredentialHasher;

/// Avatar assigned to newly registered accounts.
pub const DEFAULT_AVATAR: &str =
    "https://images.pexels.com/photos/771742/pexels-photo-771742.jpeg?auto=compress&cs=tinysrgb&w=150";

/// Demo accounts: id, name, email, password, avatar.
const DEMO_ACCOUNTS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "1",
        "John Doe",
        "john@example.com",
        "password123",
        DEFAULT_AVATAR,
    ),
    (
        "2",
        "Jane Smith",
        "jane@example.com",
        "password123",
        "https://images.pexels.com/photos/415829/pexels-photo-415829.jpeg?auto=compress&cs=tinysrgb&w=150",
    ),
    (
        "3",
        "Admin User",
        "admin@eliteshop.com",
        "admin123",
        "https://images.pexels.com/photos/1222271/pexels-photo-1222271.jpeg?auto=compress&cs=tinysrgb&w=150",
    ),
];

/// Access to the account directory record.
pub struct Directory<'a> {
    store: &'a dyn KeyValueStore,
    hasher: &'a CredentialHasher,
}

impl<'a> Directory<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore, hasher: &'a CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// Load all accounts, seeding the demo accounts if no record exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the record cannot be read or the seed
    /// cannot be written, `AuthError::PasswordHash` if seeding fails to hash.
    pub fn load(&self) -> Result<Vec<UserAccount>, AuthError> {
        match self.store.get(keys::USERS_DB)? {
            Some(raw) => Ok(store::decode_record(keys::USERS_DB, Some(&raw)).unwrap_or_default()),
            None => {
                let seeded = self.demo_accounts()?;
                self.save(&seeded)?;
                tracing::info!(accounts = seeded.len(), "seeded account directory");
                Ok(seeded)
            }
        }
    }

    /// Replace the directory record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the write fails.
    pub fn save(&self, accounts: &[UserAccount]) -> Result<(), StoreError> {
        store::write_record(self.store, keys::USERS_DB, accounts)
    }

    fn demo_accounts(&self) -> Result<Vec<UserAccount>, AuthError> {
        let mut accounts = Vec::with_capacity(DEMO_ACCOUNTS.len());
        for &(id, name, email, password, avatar) in DEMO_ACCOUNTS {
            let Ok(email) = Email::parse(email) else {
                continue;
            };
            accounts.push(UserAccount {
                id: AccountId::new(id),
                name: name.to_owned(),
                email,
                password: self.hasher.hash(password)?,
                avatar: avatar.to_owned(),
            });
        }
        Ok(accounts)
    }
}

/// Case-insensitive lookup by email.
#[must_use]
pub fn find_by_email<'a>(accounts: &'a [UserAccount], email: &str) -> Option<&'a UserAccount> {
    accounts.iter().find(|a| a.email.matches(email))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HashingConfig;
    use crate::store::MemoryStore;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(&HashingConfig::minimal()).unwrap()
    }

    #[test]
    fn test_seeds_once() {
        let store = MemoryStore::new();
        let hasher = hasher();
        let directory = Directory::new(&store, &hasher);

        let first = directory.load().unwrap();
        assert_eq!(first.len(), 3);
        assert!(store.get(keys::USERS_DB).unwrap().is_some());

        // Secrets are stored hashed
        assert!(first.iter().all(|a| a.password.starts_with("$argon2id$")));

        let second = directory.load().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_existing_empty_directory_is_not_reseeded() {
        let store = MemoryStore::new();
        store.set(keys::USERS_DB, "[]").unwrap();
        let hasher = hasher();

        assert!(Directory::new(&store, &hasher).load().unwrap().is_empty());
        assert_eq!(store.get(keys::USERS_DB).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_directory_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(keys::USERS_DB, "{{{").unwrap();
        let hasher = hasher();

        assert!(Directory::new(&store, &hasher).load().unwrap().is_empty());
        // The corrupt record is left in place, not reseeded
        assert_eq!(store.get(keys::USERS_DB).unwrap().as_deref(), Some("{{{"));
    }

    #[test]
    fn test_find_by_email_ignores_case() {
        let store = MemoryStore::new();
        let hasher = hasher();
        let accounts = Directory::new(&store, &hasher).load().unwrap();

        let found = find_by_email(&accounts, "JANE@Example.com").unwrap();
        assert_eq!(found.name, "Jane Smith");
        assert!(find_by_email(&accounts, "nobody@example.com").is_none());
    }
}
