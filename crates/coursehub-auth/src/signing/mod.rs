//! Short-lived signed playback tokens for the downstream media host.

pub mod issuer;

pub use issuer::{SignedMediaUrlIssuer, SignedPlayback};
