//! Policy-gated signed playback token issuance.

pub mod service;

pub use service::PlaybackService;
