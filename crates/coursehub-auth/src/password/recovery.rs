//! Single-use password recovery tokens.
//!
//! The plaintext token is handed to the account holder exactly once; only
//! its SHA-256 digest is persisted, so a leaked database row cannot be
//! replayed as a reset credential.

use rand::RngExt;
use sha2::{Digest, Sha256};

/// A freshly generated recovery token and its storable digest.
#[derive(Debug, Clone)]
pub struct RecoveryToken {
    /// Plaintext token to deliver to the account holder.
    pub plaintext: String,
    /// SHA-256 hex digest to persist.
    pub digest: String,
}

impl RecoveryToken {
    /// Generates a 32-byte random token, hex encoded.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let bytes: Vec<u8> = (0..32).map(|_| rng.random::<u8>()).collect();
        let plaintext = hex::encode(bytes);
        let digest = hash_recovery_token(&plaintext);
        Self { plaintext, digest }
    }
}

/// Computes the storable digest of a recovery token.
pub fn hash_recovery_token(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = RecoveryToken::generate();
        assert_eq!(token.plaintext.len(), 64);
        assert_eq!(token.digest.len(), 64);
        assert_ne!(token.plaintext, token.digest);
    }

    #[test]
    fn test_digest_is_deterministic() {
        let token = RecoveryToken::generate();
        assert_eq!(token.digest, hash_recovery_token(&token.plaintext));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = RecoveryToken::generate();
        let b = RecoveryToken::generate();
        assert_ne!(a.plaintext, b.plaintext);
    }
}
