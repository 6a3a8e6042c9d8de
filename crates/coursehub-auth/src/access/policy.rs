//! Video access decisions.
//!
//! The decision itself is a pure function over the subject's role, course
//! ownership, the video's preview flag, and the subject's enrollment
//! status. Layers are evaluated in a fixed order and the first grant
//! wins; the enrollment check runs last because it is the only layer
//! that needs an extra lookup.

use std::sync::Arc;

use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_database::store::{CatalogStore, EnrollmentStore};
use coursehub_entity::account::{Account, AccountRole};
use coursehub_entity::course::Video;
use coursehub_entity::enrollment::EnrollmentStatus;

/// Which layer granted access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantBasis {
    /// The subject is a platform administrator.
    AdminOverride,
    /// The subject owns the course the video belongs to.
    CourseOwner,
    /// The video is flagged as a free preview.
    Preview,
    /// The subject holds an Active enrollment in the course.
    ActiveEnrollment,
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No layer granted access; an Active enrollment would be required.
    EnrollmentRequired,
}

/// Outcome of an access policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access granted, with the layer that granted it.
    Granted(GrantBasis),
    /// Access denied.
    Denied(DenialReason),
}

impl AccessDecision {
    /// Whether this decision grants access.
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted(_))
    }
}

/// Pure access decision over already-loaded facts.
///
/// Only an enrollment whose status is exactly Active grants access;
/// Pending, Rejected, Completed, Refunded, and Expired all deny.
pub fn decide(
    role: AccountRole,
    subject_id: Uuid,
    instructor_id: Uuid,
    is_preview: bool,
    enrollment: Option<EnrollmentStatus>,
) -> AccessDecision {
    if role.is_admin() {
        return AccessDecision::Granted(GrantBasis::AdminOverride);
    }
    if subject_id == instructor_id {
        return AccessDecision::Granted(GrantBasis::CourseOwner);
    }
    if is_preview {
        return AccessDecision::Granted(GrantBasis::Preview);
    }
    if enrollment == Some(EnrollmentStatus::Active) {
        return AccessDecision::Granted(GrantBasis::ActiveEnrollment);
    }
    AccessDecision::Denied(DenialReason::EnrollmentRequired)
}

/// Evaluates access to videos against the stores.
#[derive(Clone)]
pub struct AccessPolicyEngine {
    /// Course and video lookups.
    catalog: Arc<dyn CatalogStore>,
    /// Enrollment lookups.
    enrollments: Arc<dyn EnrollmentStore>,
}

impl std::fmt::Debug for AccessPolicyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessPolicyEngine").finish()
    }
}

impl AccessPolicyEngine {
    /// Creates a new policy engine over the given stores.
    pub fn new(catalog: Arc<dyn CatalogStore>, enrollments: Arc<dyn EnrollmentStore>) -> Self {
        Self {
            catalog,
            enrollments,
        }
    }

    /// Evaluates the subject's access to the given video.
    ///
    /// The enrollment lookup is skipped entirely when an earlier layer
    /// already grants access.
    pub async fn evaluate(
        &self,
        subject: &Account,
        video_id: Uuid,
    ) -> Result<(Video, AccessDecision), AppError> {
        let video = self
            .catalog
            .find_video(video_id)
            .await?
            .ok_or_else(|| AppError::not_found("Video not found"))?;

        let course = self
            .catalog
            .find_course(video.course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        let early = decide(
            subject.role,
            subject.id,
            course.instructor_id,
            video.is_preview,
            None,
        );
        if early.is_granted() {
            return Ok((video, early));
        }

        let enrollment = self
            .enrollments
            .find_by_account_course(subject.id, course.id)
            .await?;

        let decision = decide(
            subject.role,
            subject.id,
            course.instructor_id,
            video.is_preview,
            enrollment.map(|e| e.status),
        );
        Ok((video, decision))
    }

    /// Like [`evaluate`](Self::evaluate) but turns a denial into a
    /// `Forbidden` error, returning the video only on a grant.
    pub async fn authorize(&self, subject: &Account, video_id: Uuid) -> Result<Video, AppError> {
        let (video, decision) = self.evaluate(subject, video_id).await?;
        match decision {
            AccessDecision::Granted(_) => Ok(video),
            AccessDecision::Denied(DenialReason::EnrollmentRequired) => Err(AppError::forbidden(
                "You must be enrolled to watch this video",
            )),
        }
    }
}
