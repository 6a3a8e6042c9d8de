//! Account entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::AccountRole;

/// A registered account on the platform.
///
/// `current_session_token` holds the single live session token for the
/// account; every successful login overwrites it, which is what revokes
/// the previous device. `courses_count` is a derived aggregate maintained
/// by the enrollment lifecycle and must always equal the number of Active
/// enrollments for this account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Display name.
    pub user_name: String,
    /// Unique email address (stored lowercase).
    pub email: String,
    /// Argon2id password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role.
    pub role: AccountRole,
    /// Whether the account is blocked from all authenticated access.
    pub is_blocked: bool,
    /// The one live session token, or None when logged out.
    #[serde(skip_serializing)]
    pub current_session_token: Option<String>,
    /// SHA-256 hash of the single-use password recovery token.
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>,
    /// Recovery token expiry.
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    /// Number of Active enrollments held by this account (derived).
    pub courses_count: i64,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check whether the presented token is the account's live session.
    pub fn holds_session(&self, token: &str) -> bool {
        self.current_session_token.as_deref() == Some(token)
    }
}

/// Data required to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    /// Display name.
    pub user_name: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: AccountRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account_with_token(token: Option<&str>) -> Account {
        Account {
            id: Uuid::new_v4(),
            user_name: "sara".to_string(),
            email: "sara@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: AccountRole::Student,
            is_blocked: false,
            current_session_token: token.map(String::from),
            reset_token_hash: None,
            reset_token_expires_at: None,
            courses_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_holds_session_compares_by_value() {
        let account = account_with_token(Some("tok-a"));
        assert!(account.holds_session("tok-a"));
        assert!(!account.holds_session("tok-b"));
    }

    #[test]
    fn test_holds_session_false_when_logged_out() {
        let account = account_with_token(None);
        assert!(!account.holds_session("tok-a"));
    }
}
