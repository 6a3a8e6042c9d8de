//! Layered access policy for protected video content.

pub mod policy;

pub use policy::{AccessDecision, AccessPolicyEngine, DenialReason, GrantBasis, decide};
