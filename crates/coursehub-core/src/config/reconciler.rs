//! Counter reconciliation job configuration.

use serde::{Deserialize, Serialize};

/// Settings for the aggregate counter reconciliation job.
///
/// The two counter increments performed by an enrollment approval target
/// different records and are applied best-effort; this job recomputes the
/// counters from the Active enrollment set and corrects any drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Whether the periodic reconciliation loop runs.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Interval between reconciliation cycles in seconds.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_seconds: default_interval(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_interval() -> u64 {
    300
}
