//! # coursehub-database
//!
//! Persistence layer for CourseHub. Defines the three store traits the
//! rest of the system depends on (`CredentialStore`, `CatalogStore`,
//! `EnrollmentStore`), their PostgreSQL implementations, and an in-memory
//! implementation used for development and unit tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use store::{CatalogStore, CredentialStore, EnrollmentStore};
