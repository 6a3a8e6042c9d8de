//! Media playback token configuration.

use serde::{Deserialize, Serialize};

/// Settings for signed playback URL generation.
///
/// `token_key` is the shared secret the downstream media host uses to
/// recompute the playback digest. Changing it (or the hash algorithm)
/// is a breaking wire-format change for every issued URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Shared token security key. Must be set; validated at startup.
    #[serde(default)]
    pub token_key: String,
    /// Media library identifier at the downstream host.
    #[serde(default)]
    pub library_id: String,
    /// Signed URL TTL in seconds.
    #[serde(default = "default_signed_url_ttl")]
    pub signed_url_ttl_seconds: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            token_key: String::new(),
            library_id: String::new(),
            signed_url_ttl_seconds: default_signed_url_ttl(),
        }
    }
}

fn default_signed_url_ttl() -> u64 {
    3600
}
