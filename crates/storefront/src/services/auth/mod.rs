//! Session state: sign-in, sign-up and sign-out.
//!
//! The [`SessionManager`] owns the persisted session record and checks
//! credentials against the account [`directory`]. Every successful transition
//! writes the session record and then publishes a `user-state-changed` event.

pub mod directory;
mod error;
pub mod password;

pub use directory::{DEFAULT_AVATAR, Directory};
pub use error::{AuthError, ValidationError};
pub use password::{CredentialHasher, Verification};

use tracing::instrument;

use eliteshop_core::{AccountId, AccountSummary, Email, Session, UserAccount};

use crate::config::{Latency, ReauthPolicy};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::events::{EventBus, SessionAction, UserStateChanged};
use crate::store::{self, StoreHandle, keys};

/// Minimum password length accepted on sign-in.
const MIN_LOGIN_PASSWORD_LENGTH: usize = 3;

/// Minimum password length accepted on sign-up.
const MIN_REGISTER_PASSWORD_LENGTH: usize = 6;

/// Minimum display name length accepted on sign-up.
const MIN_NAME_LENGTH: usize = 2;

/// Owner of the current-user record.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: StoreHandle,
    events: EventBus,
    hasher: CredentialHasher,
    latency: Latency,
    policy: ReauthPolicy,
}

impl SessionManager {
    /// Create a session manager over `store`, publishing on `events`.
    #[must_use]
    pub fn new(
        store: StoreHandle,
        events: EventBus,
        hasher: CredentialHasher,
        latency: Latency,
        policy: ReauthPolicy,
    ) -> Self {
        Self {
            store,
            events,
            hasher,
            latency,
            policy,
        }
    }

    /// The persisted session, if any. A corrupt record reads as signed out.
    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        store::read_record(&*self.store, keys::CURRENT_USER)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for malformed input,
    /// `AuthError::AlreadyAuthenticated` if a session exists and the policy
    /// is [`ReauthPolicy::Reject`], `AuthError::NotFound` for an unknown
    /// email, `AuthError::InvalidCredential` for a wrong password and
    /// `AuthError::Store` if the session cannot be saved.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        tokio::time::sleep(self.latency.login).await;

        validate_login(email, password)?;
        self.check_policy()?;

        let directory = Directory::new(&*self.store, &self.hasher);
        let mut accounts = directory.load()?;
        let account = directory::find_by_email(&accounts, email).ok_or(AuthError::NotFound)?;

        let verification = self.hasher.verify(password, &account.password);
        if !verification.is_match() {
            return Err(AuthError::InvalidCredential);
        }

        let session = account.session();
        if verification == Verification::Legacy {
            self.upgrade_secret(&directory, &mut accounts, &session.id, password);
        }

        self.commit(&session, SessionAction::Login)?;
        tracing::info!(user_id = %session.id, "user logged in");
        Ok(session)
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` for malformed input,
    /// `AuthError::AlreadyAuthenticated` if a session exists and the policy
    /// is [`ReauthPolicy::Reject`], `AuthError::Conflict` if the email is
    /// already registered and `AuthError::Store` if a write fails.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        tokio::time::sleep(self.latency.register).await;

        validate_registration(name, email, password)?;
        let email = Email::parse_normalized(email).map_err(|_| ValidationError::InvalidEmail)?;
        self.check_policy()?;

        let directory = Directory::new(&*self.store, &self.hasher);
        let mut accounts = directory.load()?;
        if directory::find_by_email(&accounts, email.as_str()).is_some() {
            return Err(AuthError::Conflict);
        }

        let account = UserAccount {
            id: AccountId::generate(),
            name: name.trim().to_owned(),
            email,
            password: self.hasher.hash(password)?,
            avatar: DEFAULT_AVATAR.to_owned(),
        };
        let session = account.session();
        accounts.push(account);
        directory.save(&accounts)?;

        self.commit(&session, SessionAction::Register)?;
        tracing::info!(user_id = %session.id, "user registered");
        Ok(session)
    }

    /// Sign out. Returns the session that was signed out, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the session record cannot be deleted; no
    /// event is published in that case.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<Option<Session>, AuthError> {
        let previous = self.current_session();
        self.store.remove(keys::CURRENT_USER)?;

        self.events.publish(
            &UserStateChanged {
                user: None,
                action: SessionAction::Logout,
                previous_user: previous.clone(),
            }
            .into(),
        );
        clear_sentry_user();
        tracing::info!(
            user_id = ?previous.as_ref().map(|s| s.id.as_str()),
            "user logged out"
        );
        Ok(previous)
    }

    /// Email and name of every registered account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the directory cannot be read or seeded.
    pub fn registered_users(&self) -> Result<Vec<AccountSummary>, AuthError> {
        let accounts = Directory::new(&*self.store, &self.hasher).load()?;
        Ok(accounts.iter().map(UserAccount::summary).collect())
    }

    fn check_policy(&self) -> Result<(), AuthError> {
        match (self.policy, self.current_session()) {
            (ReauthPolicy::Reject, Some(current)) => {
                Err(AuthError::AlreadyAuthenticated(current.email))
            }
            _ => Ok(()),
        }
    }

    fn commit(&self, session: &Session, action: SessionAction) -> Result<(), AuthError> {
        store::write_record(&*self.store, keys::CURRENT_USER, session)?;
        self.events.publish(
            &UserStateChanged {
                user: Some(session.clone()),
                action,
                previous_user: None,
            }
            .into(),
        );
        set_sentry_user(&session.id, Some(session.email.as_str()));
        Ok(())
    }

    /// Replace a plaintext secret with its hash. Failure only costs the
    /// upgrade, never the sign-in.
    fn upgrade_secret(
        &self,
        directory: &Directory<'_>,
        accounts: &mut [UserAccount],
        id: &AccountId,
        password: &str,
    ) {
        let hash = match self.hasher.hash(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "failed to upgrade credential");
                return;
            }
        };
        let Some(account) = accounts.iter_mut().find(|a| &a.id == id) else {
            return;
        };
        account.password = hash;
        match directory.save(accounts) {
            Ok(()) => tracing::info!(user_id = %id, "upgraded plaintext credential"),
            Err(e) => tracing::warn!(user_id = %id, error = %e, "failed to upgrade credential"),
        }
    }
}

fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < MIN_LOGIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_LOGIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    if password.chars().count() < MIN_REGISTER_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_REGISTER_PASSWORD_LENGTH,
        });
    }
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort {
            min: MIN_NAME_LENGTH,
        });
    }
    Ok(())
}
