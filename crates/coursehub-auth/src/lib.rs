//! # coursehub-auth
//!
//! Authentication and authorization core for CourseHub.
//!
//! ## Modules
//!
//! - `jwt` — session token encoding and validation
//! - `password` — Argon2id hashing and single-use recovery tokens
//! - `session` — the session token authority (single live session per account)
//! - `access` — the layered access policy engine for protected video content
//! - `signing` — short-lived signed playback tokens for the media host

pub mod access;
pub mod jwt;
pub mod password;
pub mod session;
pub mod signing;

pub use access::{AccessDecision, AccessPolicyEngine, DenialReason, GrantBasis};
pub use jwt::{Claims, SessionTokenDecoder, SessionTokenEncoder};
pub use password::PasswordHasher;
pub use session::{LoginResult, SessionTokenAuthority};
pub use signing::{SignedMediaUrlIssuer, SignedPlayback};
