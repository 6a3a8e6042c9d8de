//! Single-active-session token authority.

pub mod authority;

pub use authority::{LoginResult, SessionTokenAuthority};
