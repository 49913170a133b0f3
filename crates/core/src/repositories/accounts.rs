//! User account management.
//!
//! Accounts are keyed by the SHA-256 of their normalised email, which gives every email a
//! fixed storage location and makes uniqueness a matter of exclusive directory creation:
//!
//! ```text
//! users/
//!   <s1>/
//!     <s2>/
//!       <sha256(email)>/
//!         user.yaml
//! ```

use crate::config::CoreConfig;
use crate::constants::USER_FILENAME;
use crate::error::{AccountError, AccountResult, StoreError};
use crate::ids::{sharded_dir, UserId};
use crate::password::{hash_password, verify_password};
use crate::repositories::shared::{create_yaml_entity, read_yaml};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use triage_types::EmailAddress;

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registration and login against the file-backed account store.
#[derive(Clone, Debug)]
pub struct AccountService {
    cfg: Arc<CoreConfig>,
    // Checked in place of a stored hash when the email is unknown.
    dummy_hash: Arc<OnceLock<String>>,
}

impl AccountService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            cfg,
            dummy_hash: Arc::default(),
        }
    }

    fn dummy_hash(&self) -> &str {
        self.dummy_hash
            .get_or_init(|| hash_password("", self.cfg.password_iterations()))
    }

    fn account_dir(&self, email: &EmailAddress) -> PathBuf {
        let key = hex::encode(Sha256::digest(email.as_str().as_bytes()));
        sharded_dir(&self.cfg.users_dir(), &key)
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// - [`AccountError::MissingFields`] if the email or password is blank
    /// - [`AccountError::PasswordMismatch`] if the confirmation differs
    /// - [`AccountError::InvalidEmail`] if the email cannot be parsed
    /// - [`AccountError::EmailTaken`] if an account already uses this email
    pub fn register(
        &self,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> AccountResult<UserAccount> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AccountError::MissingFields);
        }
        if password != password_confirmation {
            return Err(AccountError::PasswordMismatch);
        }
        let email = EmailAddress::parse(email)?;

        let account = UserAccount {
            id: UserId::new(),
            password_hash: hash_password(password, self.cfg.password_iterations()),
            email,
            created_at: Utc::now(),
        };

        create_yaml_entity(&self.account_dir(&account.email), USER_FILENAME, &account)?;
        tracing::info!(user_id = %account.id, "account registered");
        Ok(account)
    }

    /// Authenticates an email/password pair.
    ///
    /// Unknown emails and wrong passwords both yield [`AccountError::InvalidCredentials`], and
    /// both run the key derivation.
    pub fn login(&self, email: &str, password: &str) -> AccountResult<UserAccount> {
        let account = match EmailAddress::parse(email) {
            Ok(email) => self.find(&email)?,
            Err(_) => None,
        };
        let Some(account) = account else {
            let _ = verify_password(password, self.dummy_hash());
            return Err(AccountError::InvalidCredentials);
        };

        match verify_password(password, &account.password_hash) {
            Some(true) => Ok(account),
            Some(false) => Err(AccountError::InvalidCredentials),
            None => Err(AccountError::MalformedHash),
        }
    }

    /// Looks up an account by email.
    pub fn find(&self, email: &EmailAddress) -> AccountResult<Option<UserAccount>> {
        let path = self.account_dir(email).join(USER_FILENAME);
        match read_yaml::<UserAccount>(&path) {
            Ok(account) => Ok(Some(account)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
