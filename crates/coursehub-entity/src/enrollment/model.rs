//! Enrollment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::EnrollmentStatus;

/// Reference to an uploaded payment proof, returned by the file-intake
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    /// Stable URL of the uploaded artifact.
    pub url: String,
    /// Identifier assigned by the file-intake service.
    pub file_id: String,
}

/// An enrollment request linking one account to one course.
///
/// At most one row exists per (account, course) pair; rows are never
/// hard-deleted. Status changes go through the enrollment lifecycle only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    /// Unique enrollment identifier.
    pub id: Uuid,
    /// The enrolling account (lookup reference, not ownership).
    pub account_id: Uuid,
    /// The target course (lookup reference, not ownership).
    pub course_id: Uuid,
    /// Current state.
    pub status: EnrollmentStatus,
    /// Payment proof URL.
    pub proof_url: String,
    /// Payment proof file identifier.
    pub proof_file_id: String,
    /// When an admin approved or rejected the request.
    pub decided_at: Option<DateTime<Utc>>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new enrollment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEnrollment {
    /// The enrolling account.
    pub account_id: Uuid,
    /// The target course.
    pub course_id: Uuid,
    /// Payment proof attached at creation.
    pub proof: ProofArtifact,
}
