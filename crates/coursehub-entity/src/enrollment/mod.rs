//! Enrollment entity and its state machine.

pub mod model;
pub mod status;

pub use model::{CreateEnrollment, Enrollment, ProofArtifact};
pub use status::EnrollmentStatus;
