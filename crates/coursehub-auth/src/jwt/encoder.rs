//! Session token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use coursehub_core::config::auth::AuthConfig;
use coursehub_core::error::AppError;
use coursehub_entity::account::Account;

use super::claims::Claims;

/// Creates signed session tokens.
#[derive(Clone)]
pub struct SessionTokenEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Session token TTL in hours.
    session_ttl_hours: i64,
}

impl std::fmt::Debug for SessionTokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenEncoder")
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish()
    }
}

impl SessionTokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            session_ttl_hours: config.session_ttl_hours as i64,
        }
    }

    /// Generates a new session token for the given account.
    ///
    /// Each call produces a distinct token (fresh `jti`), even for the
    /// same account within the same second.
    pub fn generate(&self, account: &Account) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::hours(self.session_ttl_hours);

        let claims = Claims {
            sub: account.id,
            email: account.email.clone(),
            role: account.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok((token, exp))
    }
}
