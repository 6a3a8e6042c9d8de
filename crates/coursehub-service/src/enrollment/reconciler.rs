//! Derived counter reconciliation against the enrollment table.
//!
//! `students_count` and `courses_count` are maintained inline by the
//! lifecycle, but a crash between the status swap and the counter update
//! leaves them stale. The reconciler recomputes both from the set of
//! Active enrollments and overwrites any stored value that disagrees.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_database::store::{CatalogStore, CredentialStore, EnrollmentStore};

/// Outcome of one reconciliation cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Courses whose students_count was corrected.
    pub courses_corrected: u32,
    /// Accounts whose courses_count was corrected.
    pub accounts_corrected: u32,
}

impl ReconcileReport {
    /// Whether any stored counter disagreed with the Active set.
    pub fn drift_detected(&self) -> bool {
        self.courses_corrected > 0 || self.accounts_corrected > 0
    }
}

/// Reconciles the derived aggregate counters with enrollment reality.
#[derive(Clone)]
pub struct CounterReconciler {
    /// Source of truth: the Active enrollment set.
    enrollments: Arc<dyn EnrollmentStore>,
    /// Stored per-course counters.
    catalog: Arc<dyn CatalogStore>,
    /// Stored per-account counters.
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for CounterReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterReconciler").finish()
    }
}

impl CounterReconciler {
    /// Creates a new reconciler over the given stores.
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

    /// Performs a full reconciliation cycle:
    ///
    /// 1. Count Active enrollments per course and per account.
    /// 2. Compare with every stored counter.
    /// 3. Overwrite each stored counter that disagrees.
    pub async fn reconcile(&self) -> Result<ReconcileReport, AppError> {
        let mut report = ReconcileReport::default();

        let actual_by_course: HashMap<Uuid, i64> =
            self.enrollments.active_counts_by_course().await?.into_iter().collect();
        for (course_id, stored) in self.catalog.list_students_counts().await? {
            let actual = actual_by_course.get(&course_id).copied().unwrap_or(0);
            if stored != actual {
                warn!(
                    course_id = %course_id,
                    stored,
                    actual,
                    "Correcting students count drift"
                );
                self.catalog.set_students_count(course_id, actual).await?;
                report.courses_corrected += 1;
            }
        }

        let actual_by_account: HashMap<Uuid, i64> =
            self.enrollments.active_counts_by_account().await?.into_iter().collect();
        for (account_id, stored) in self.credentials.list_courses_counts().await? {
            let actual = actual_by_account.get(&account_id).copied().unwrap_or(0);
            if stored != actual {
                warn!(
                    account_id = %account_id,
                    stored,
                    actual,
                    "Correcting courses count drift"
                );
                self.credentials.set_courses_count(account_id, actual).await?;
                report.accounts_corrected += 1;
            }
        }

        if report.drift_detected() {
            info!(
                courses_corrected = report.courses_corrected,
                accounts_corrected = report.accounts_corrected,
                "Counter reconciliation corrected drift"
            );
        }

        Ok(report)
    }

    /// Runs one cycle during startup to recover from crashes that landed
    /// between a status swap and its counter update.
    pub async fn startup_recovery(&self) -> Result<(), AppError> {
        info!("Running startup counter recovery");
        let report = self.reconcile().await?;
        if report.drift_detected() {
            info!("Startup recovery corrected counter drift");
        } else {
            info!("Startup recovery: counters are consistent");
        }
        Ok(())
    }
}
