//! Enrollment state machine with exactly-once counter maintenance.
//!
//! Every decision is a compare-and-swap on the stored status. The swap is
//! the single commit point: counter increments happen only on the call
//! that actually moved the row, so two admins approving the same request
//! concurrently bump each counter once, not twice. Counter updates after
//! a successful swap are best effort; drift is repaired by the
//! [`CounterReconciler`](super::reconciler::CounterReconciler).

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_database::store::{CatalogStore, CredentialStore, EnrollmentStore};
use coursehub_entity::enrollment::{
    CreateEnrollment, Enrollment, EnrollmentStatus, ProofArtifact,
};

/// Drives enrollment requests through their lifecycle.
#[derive(Clone)]
pub struct EnrollmentLifecycle {
    /// Enrollment persistence.
    enrollments: Arc<dyn EnrollmentStore>,
    /// Course lookups and the per-course students counter.
    catalog: Arc<dyn CatalogStore>,
    /// Account lookups and the per-account courses counter.
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for EnrollmentLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrollmentLifecycle").finish()
    }
}

impl EnrollmentLifecycle {
    /// Creates a new lifecycle service over the given stores.
    pub fn new(
        enrollments: Arc<dyn EnrollmentStore>,
        catalog: Arc<dyn CatalogStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            enrollments,
            catalog,
            credentials,
        }
    }

    /// Submits an enrollment request with its payment proof.
    ///
    /// The request starts Pending. At most one enrollment may ever exist
    /// per (account, course) pair; a second request fails with `Conflict`
    /// regardless of the first one's status.
    pub async fn request(
        &self,
        account_id: Uuid,
        course_id: Uuid,
        proof: ProofArtifact,
    ) -> Result<Enrollment, AppError> {
        let course = self
            .catalog
            .find_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        if !course.is_published {
            return Err(AppError::validation("Course is not open for enrollment"));
        }
        if course.is_owned_by(account_id) {
            return Err(AppError::validation(
                "Instructors cannot enroll in their own course",
            ));
        }

        let enrollment = self
            .enrollments
            .create(&CreateEnrollment {
                account_id,
                course_id,
                proof,
            })
            .await?;

        info!(
            enrollment_id = %enrollment.id,
            account_id = %account_id,
            course_id = %course_id,
            "Enrollment requested"
        );
        Ok(enrollment)
    }

    /// Approves a Pending request, activating access and bumping both
    /// derived counters exactly once.
    pub async fn approve(&self, enrollment_id: Uuid) -> Result<Enrollment, AppError> {
        let enrollment = self
            .transition(enrollment_id, EnrollmentStatus::Pending, EnrollmentStatus::Active)
            .await?;

        self.adjust_counters(&enrollment, 1).await;

        info!(enrollment_id = %enrollment.id, "Enrollment approved");
        Ok(enrollment)
    }

    /// Rejects a Pending request. Counters are untouched because the row
    /// never entered Active.
    pub async fn reject(&self, enrollment_id: Uuid) -> Result<Enrollment, AppError> {
        let enrollment = self
            .transition(
                enrollment_id,
                EnrollmentStatus::Pending,
                EnrollmentStatus::Rejected,
            )
            .await?;

        info!(enrollment_id = %enrollment.id, "Enrollment rejected");
        Ok(enrollment)
    }

    /// Marks an Active enrollment Completed, releasing its counter slots.
    pub async fn complete(&self, enrollment_id: Uuid) -> Result<Enrollment, AppError> {
        self.leave_active(enrollment_id, EnrollmentStatus::Completed)
            .await
    }

    /// Marks an Active enrollment Refunded, releasing its counter slots.
    pub async fn refund(&self, enrollment_id: Uuid) -> Result<Enrollment, AppError> {
        self.leave_active(enrollment_id, EnrollmentStatus::Refunded)
            .await
    }

    /// Marks an Active enrollment Expired, releasing its counter slots.
    pub async fn expire(&self, enrollment_id: Uuid) -> Result<Enrollment, AppError> {
        self.leave_active(enrollment_id, EnrollmentStatus::Expired)
            .await
    }

    /// Lists an account's enrollments, newest first.
    pub async fn list_for_account(&self, account_id: Uuid) -> Result<Vec<Enrollment>, AppError> {
        self.enrollments.list_by_account(account_id).await
    }

    async fn leave_active(
        &self,
        enrollment_id: Uuid,
        to: EnrollmentStatus,
    ) -> Result<Enrollment, AppError> {
        let enrollment = self
            .transition(enrollment_id, EnrollmentStatus::Active, to)
            .await?;

        self.adjust_counters(&enrollment, -1).await;

        info!(enrollment_id = %enrollment.id, status = %to, "Enrollment closed");
        Ok(enrollment)
    }

    /// Runs the compare-and-swap and turns a miss into the right error:
    /// `NotFound` when the row does not exist, `InvalidTransition` when
    /// it exists but is not in `from`.
    async fn transition(
        &self,
        enrollment_id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<Enrollment, AppError> {
        match self.enrollments.transition(enrollment_id, from, to).await? {
            Some(enrollment) => Ok(enrollment),
            None => {
                let current = self
                    .enrollments
                    .find(enrollment_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Enrollment not found"))?;
                Err(AppError::invalid_transition(format!(
                    "Enrollment is {}, expected {from}",
                    current.status
                )))
            }
        }
    }

    /// Applies the same delta to both derived counters. Failures are
    /// logged, not propagated: the status swap already committed and the
    /// reconciler restores the counters from the Active set.
    async fn adjust_counters(&self, enrollment: &Enrollment, delta: i64) {
        if let Err(e) = self
            .catalog
            .adjust_students_count(enrollment.course_id, delta)
            .await
        {
            warn!(
                course_id = %enrollment.course_id,
                error = %e,
                "Failed to adjust students count, leaving it to reconciliation"
            );
        }
        if let Err(e) = self
            .credentials
            .adjust_courses_count(enrollment.account_id, delta)
            .await
        {
            warn!(
                account_id = %enrollment.account_id,
                error = %e,
                "Failed to adjust courses count, leaving it to reconciliation"
            );
        }
    }
}
