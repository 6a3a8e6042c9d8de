//! Playback token signing.
//!
//! The media host verifies `hex(sha256(key || media_id || expires))`
//! against the same shared key, so the token grants playback for exactly
//! one asset until the expiry second. The platform session is not
//! involved; possession of the token is sufficient at the media edge.

use chrono::Utc;
use sha2::{Digest, Sha256};

use coursehub_core::config::media::MediaConfig;
use coursehub_core::error::AppError;

/// A signed playback grant for one media asset.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignedPlayback {
    /// Hex-encoded SHA-256 signature.
    pub token: String,
    /// Expiry in seconds since epoch.
    pub expires: i64,
    /// The asset the token is bound to.
    #[serde(rename = "videoId")]
    pub video_id: String,
}

/// Issues signed playback tokens using the media host's shared key.
#[derive(Clone)]
pub struct SignedMediaUrlIssuer {
    /// Shared signing key.
    token_key: String,
    /// Token lifetime in seconds.
    ttl_seconds: u64,
}

impl std::fmt::Debug for SignedMediaUrlIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedMediaUrlIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl SignedMediaUrlIssuer {
    /// Creates an issuer from media configuration.
    ///
    /// Fails with `Configuration` when the signing key is missing, so a
    /// misconfigured deployment is caught at startup rather than at the
    /// first playback request.
    pub fn from_config(config: &MediaConfig) -> Result<Self, AppError> {
        if config.token_key.trim().is_empty() {
            return Err(AppError::configuration(
                "Media signing key is not configured",
            ));
        }
        Ok(Self {
            token_key: config.token_key.clone(),
            ttl_seconds: config.signed_url_ttl_seconds,
        })
    }

    /// Signs a playback grant for the given media asset, expiring after
    /// the configured TTL.
    pub fn sign(&self, media_id: &str) -> SignedPlayback {
        let expires = Utc::now().timestamp() + self.ttl_seconds as i64;
        self.sign_with_expiry(media_id, expires)
    }

    /// Signs a playback grant with an explicit expiry second.
    pub fn sign_with_expiry(&self, media_id: &str, expires: i64) -> SignedPlayback {
        let mut hasher = Sha256::new();
        hasher.update(self.token_key.as_bytes());
        hasher.update(media_id.as_bytes());
        hasher.update(expires.to_string().as_bytes());

        SignedPlayback {
            token: hex::encode(hasher.finalize()),
            expires,
            video_id: media_id.to_string(),
        }
    }
}
