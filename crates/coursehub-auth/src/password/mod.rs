//! Password hashing and recovery token handling.

pub mod hasher;
pub mod recovery;

pub use hasher::PasswordHasher;
pub use recovery::{RecoveryToken, hash_recovery_token};
