//! Session lifecycle authority enforcing one live session per account.
//!
//! The stored `current_session_token` is the source of truth for which
//! token is live. Issuing a session overwrites it, so the previous
//! device's token stops validating the moment the new login lands.
//! Revocation is a value-based clear and is idempotent.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use coursehub_core::config::auth::AuthConfig;
use coursehub_core::error::AppError;
use coursehub_database::store::CredentialStore;
use coursehub_entity::account::{Account, AccountRole, CreateAccount};

use crate::jwt::{SessionTokenDecoder, SessionTokenEncoder};
use crate::password::{PasswordHasher, RecoveryToken, hash_recovery_token};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// The freshly issued session token.
    pub token: String,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// The authenticated account.
    pub account: Account,
}

/// Manages registration, login, validation, and revocation of sessions.
#[derive(Clone)]
pub struct SessionTokenAuthority {
    /// Session token signing.
    encoder: SessionTokenEncoder,
    /// Session token structural validation.
    decoder: SessionTokenDecoder,
    /// Password hashing.
    hasher: PasswordHasher,
    /// Account and token persistence.
    store: Arc<dyn CredentialStore>,
    /// Auth configuration.
    config: AuthConfig,
}

impl std::fmt::Debug for SessionTokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenAuthority")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionTokenAuthority {
    /// Creates a new authority from configuration and a credential store.
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            encoder: SessionTokenEncoder::new(&config),
            decoder: SessionTokenDecoder::new(&config),
            hasher: PasswordHasher::new(),
            store,
            config,
        }
    }

    /// Registers a new account.
    ///
    /// Fails with `Validation` when the password is shorter than the
    /// configured minimum, and with `Conflict` when the email is taken.
    pub async fn register(
        &self,
        user_name: &str,
        email: &str,
        password: &str,
        role: AccountRole,
    ) -> Result<Account, AppError> {
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(AppError::validation("User name must not be empty"));
        }

        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::validation("Email address is not valid"));
        }

        if password.chars().count() < self.config.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.config.password_min_length
            )));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let account = self
            .store
            .create_account(&CreateAccount {
                user_name: user_name.to_string(),
                email,
                password_hash,
                role,
            })
            .await?;

        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Performs the login flow:
    ///
    /// 1. Find the account by email
    /// 2. Verify the password
    /// 3. Check the block flag
    /// 4. Issue a fresh token, overwriting any live session
    ///
    /// Unknown email and wrong password produce the same error, so the
    /// response does not reveal whether the email is registered.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AppError> {
        let email = email.trim().to_lowercase();
        let account = self
            .store
            .find_account_by_email(&email)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Invalid email or password"))?;

        let password_valid = self
            .hasher
            .verify_password(password, &account.password_hash)?;
        if !password_valid {
            warn!(account_id = %account.id, "Login failed: bad password");
            return Err(AppError::unauthenticated("Invalid email or password"));
        }

        if account.is_blocked {
            warn!(account_id = %account.id, "Login refused: account blocked");
            return Err(AppError::account_blocked("Account is blocked"));
        }

        self.issue(account).await
    }

    /// Issues a fresh session token for the account and stores it as the
    /// one live session. Any previously stored token is superseded.
    pub async fn issue(&self, account: Account) -> Result<LoginResult, AppError> {
        let (token, expires_at) = self.encoder.generate(&account)?;
        self.store.set_session_token(account.id, &token).await?;

        info!(account_id = %account.id, "Session issued");
        Ok(LoginResult {
            token,
            expires_at,
            account,
        })
    }

    /// Validates a presented session token end to end:
    ///
    /// 1. Signature and expiry
    /// 2. The account still exists
    /// 3. The token is the account's current live session
    /// 4. The account is not blocked
    ///
    /// Returns the freshly loaded account, so role changes since issuance
    /// take effect immediately.
    pub async fn validate(&self, token: &str) -> Result<Account, AppError> {
        let claims = self.decoder.decode_token(token)?;

        let account = self
            .store
            .find_account(claims.account_id())
            .await?
            .ok_or_else(|| AppError::unauthenticated("Account no longer exists"))?;

        if !account.holds_session(token) {
            return Err(AppError::session_superseded(
                "Session was signed in on another device",
            ));
        }

        if account.is_blocked {
            return Err(AppError::account_blocked("Account is blocked"));
        }

        Ok(account)
    }

    /// Revokes the session holding exactly this token value. Idempotent:
    /// revoking a token that is no longer live is a successful no-op.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.store.clear_session_token(token).await?;
        Ok(())
    }

    /// Starts password recovery for the given email.
    ///
    /// Returns the plaintext token for delivery when the email is known,
    /// or `None` otherwise. Callers must respond identically either way.
    pub async fn start_recovery(&self, email: &str) -> Result<Option<String>, AppError> {
        let email = email.trim().to_lowercase();
        let Some(account) = self.store.find_account_by_email(&email).await? else {
            return Ok(None);
        };

        let token = RecoveryToken::generate();
        let expires_at =
            Utc::now() + chrono::Duration::minutes(self.config.recovery_token_ttl_minutes as i64);
        self.store
            .set_recovery_token(account.id, &token.digest, expires_at)
            .await?;

        info!(account_id = %account.id, "Password recovery started");
        Ok(Some(token.plaintext))
    }

    /// Consumes a recovery token and sets a new password.
    ///
    /// The token is single-use: the store clears it in the same step that
    /// resolves it, so a second reset with the same token fails. The live
    /// session, if any, is also revoked.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        if new_password.chars().count() < self.config.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.config.password_min_length
            )));
        }

        let digest = hash_recovery_token(token);
        let account = self
            .store
            .take_account_by_recovery_token(&digest)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Recovery token is invalid or expired"))?;

        let password_hash = self.hasher.hash_password(new_password)?;
        self.store.update_password(account.id, &password_hash).await?;

        if let Some(live) = account.current_session_token.as_deref() {
            self.store.clear_session_token(live).await?;
        }

        info!(account_id = %account.id, "Password reset completed");
        Ok(())
    }

    /// Changes the password of an authenticated account after verifying
    /// the current one.
    pub async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if new_password.chars().count() < self.config.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.config.password_min_length
            )));
        }

        let account = self
            .store
            .find_account(account_id)
            .await?
            .ok_or_else(|| AppError::not_found("Account not found"))?;

        let current_valid = self
            .hasher
            .verify_password(current_password, &account.password_hash)?;
        if !current_valid {
            return Err(AppError::unauthenticated("Current password is incorrect"));
        }

        let password_hash = self.hasher.hash_password(new_password)?;
        self.store.update_password(account.id, &password_hash).await?;

        info!(account_id = %account.id, "Password changed");
        Ok(())
    }
}
