//! Enrollment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::enrollment::{CreateEnrollment, Enrollment, EnrollmentStatus};

use crate::store::EnrollmentStore;

/// Repository for enrollment requests.
#[derive(Debug, Clone)]
pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    /// Create a new enrollment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentStore for EnrollmentRepository {
    async fn create(&self, data: &CreateEnrollment) -> AppResult<Enrollment> {
        sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (account_id, course_id, proof_url, proof_file_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(data.account_id)
        .bind(data.course_id)
        .bind(&data.proof.url)
        .bind(&data.proof.file_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("enrollments_account_id_course_id_key") =>
            {
                AppError::conflict("Account is already enrolled in this course")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create enrollment", e),
        })
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Enrollment>> {
        sqlx::query_as::<_, Enrollment>("SELECT * FROM enrollments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find enrollment", e)
            })
    }

    async fn find_by_account_course(
        &self,
        account_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Enrollment>> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE account_id = $1 AND course_id = $2",
        )
        .bind(account_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find enrollment", e))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> AppResult<Option<Enrollment>> {
        // The status guard in the WHERE clause makes the swap atomic: of
        // two concurrent identical transitions exactly one sees a row.
        sqlx::query_as::<_, Enrollment>(
            "UPDATE enrollments SET status = $3, \
                                    decided_at = CASE WHEN $2 = 'pending'::enrollment_status \
                                                      THEN NOW() ELSE decided_at END, \
                                    updated_at = NOW() \
             WHERE id = $1 AND status = $2 \
             RETURNING *",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to transition enrollment", e)
        })
    }

    async fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Enrollment>> {
        sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE account_id = $1 ORDER BY created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list enrollments", e))
    }

    async fn active_counts_by_account(&self) -> AppResult<Vec<(Uuid, i64)>> {
        sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT account_id, COUNT(*) FROM enrollments \
             WHERE status = 'active' GROUP BY account_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count active enrollments", e)
        })
    }

    async fn active_counts_by_course(&self) -> AppResult<Vec<(Uuid, i64)>> {
        sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT course_id, COUNT(*) FROM enrollments \
             WHERE status = 'active' GROUP BY course_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count active enrollments", e)
        })
    }
}
