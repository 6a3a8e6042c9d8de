//! Store traits separating the domain services from persistence.
//!
//! All durable state lives behind these three traits; the database is the
//! sole synchronization point. Implementations must perform read-then-write
//! operations (session token replacement, enrollment status transitions,
//! counter increments) as single atomic conditional updates, never as
//! read-modify-write in application code.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use coursehub_core::result::AppResult;
use coursehub_entity::account::{Account, CreateAccount};
use coursehub_entity::course::{Chapter, Course, CreateChapter, CreateCourse, CreateVideo, Video};
use coursehub_entity::course::VideoStatus;
use coursehub_entity::enrollment::{CreateEnrollment, Enrollment, EnrollmentStatus};

/// Persistence for account records, session tokens, and recovery tokens.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Find an account by primary key.
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find an account by email (case-insensitive).
    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Create a new account. Fails with `Conflict` if the email exists.
    async fn create_account(&self, data: &CreateAccount) -> AppResult<Account>;

    /// Overwrite the account's live session token. Whatever token was
    /// stored before is thereby revoked.
    async fn set_session_token(&self, account_id: Uuid, token: &str) -> AppResult<()>;

    /// Clear the session token on whichever account stores exactly this
    /// value. Idempotent; a no-op when no account matches.
    async fn clear_session_token(&self, token: &str) -> AppResult<()>;

    /// Store a password recovery token hash with its expiry.
    async fn set_recovery_token(
        &self,
        account_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Atomically consume an unexpired recovery token hash, returning the
    /// account it belonged to. The token is single-use: a second call with
    /// the same hash returns `None`.
    async fn take_account_by_recovery_token(&self, token_hash: &str)
        -> AppResult<Option<Account>>;

    /// Replace the account's password hash.
    async fn update_password(&self, account_id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Set or clear the account's block flag.
    async fn set_blocked(&self, account_id: Uuid, blocked: bool) -> AppResult<()>;

    /// Atomically adjust the derived Active-enrollment counter. The stored
    /// value never goes below zero.
    async fn adjust_courses_count(&self, account_id: Uuid, delta: i64) -> AppResult<()>;

    /// List every account's stored courses_count, for reconciliation.
    async fn list_courses_counts(&self) -> AppResult<Vec<(Uuid, i64)>>;

    /// Overwrite the stored courses_count with a recomputed value.
    async fn set_courses_count(&self, account_id: Uuid, value: i64) -> AppResult<()>;
}

/// Persistence for courses and their owned chapter/video tree.
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Find a course by primary key.
    async fn find_course(&self, id: Uuid) -> AppResult<Option<Course>>;

    /// Create a new course.
    async fn create_course(&self, data: &CreateCourse) -> AppResult<Course>;

    /// Publish or unpublish a course.
    async fn set_published(&self, course_id: Uuid, published: bool) -> AppResult<()>;

    /// Atomically adjust the derived Active-enrollment counter. The stored
    /// value never goes below zero.
    async fn adjust_students_count(&self, course_id: Uuid, delta: i64) -> AppResult<()>;

    /// List every course's stored students_count, for reconciliation.
    async fn list_students_counts(&self) -> AppResult<Vec<(Uuid, i64)>>;

    /// Overwrite the stored students_count with a recomputed value.
    async fn set_students_count(&self, course_id: Uuid, value: i64) -> AppResult<()>;

    /// Create a chapter at the end of the course's chapter list.
    async fn create_chapter(&self, data: &CreateChapter) -> AppResult<Chapter>;

    /// Find a chapter by primary key.
    async fn find_chapter(&self, id: Uuid) -> AppResult<Option<Chapter>>;

    /// Create a video at the end of its chapter's dense 1-based sequence.
    async fn create_video(&self, data: &CreateVideo) -> AppResult<Video>;

    /// Find a video by primary key.
    async fn find_video(&self, id: Uuid) -> AppResult<Option<Video>>;

    /// List a chapter's videos in sort order.
    async fn list_chapter_videos(&self, chapter_id: Uuid) -> AppResult<Vec<Video>>;

    /// Delete a video and close the gap in its chapter's sequence.
    /// Returns false when the video did not exist.
    async fn delete_video(&self, id: Uuid) -> AppResult<bool>;

    /// Update a video's processing status.
    async fn set_video_status(&self, id: Uuid, status: VideoStatus) -> AppResult<()>;
}

/// Persistence for enrollment requests.
#[async_trait]
pub trait EnrollmentStore: Send + Sync + 'static {
    /// Create a Pending enrollment. Fails with `Conflict` when any
    /// enrollment already exists for the (account, course) pair.
    async fn create(&self, data: &CreateEnrollment) -> AppResult<Enrollment>;

    /// Find an enrollment by primary key.
    async fn find(&self, id: Uuid) -> AppResult<Option<Enrollment>>;

    /// Find the enrollment for an (account, course) pair.
    async fn find_by_account_course(
        &self,
        account_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Enrollment>>;

    /// Compare-and-swap the enrollment status. Returns the updated row
    /// only if the stored status equalled `from` at the moment of the
    /// update; returns `None` otherwise (row missing or status moved).
    /// Two concurrent calls for the same transition can therefore succeed
    /// at most once.
    async fn transition(
        &self,
        id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> AppResult<Option<Enrollment>>;

    /// List all enrollments for an account, newest first.
    async fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Enrollment>>;

    /// Count Active enrollments grouped by account, for reconciliation.
    async fn active_counts_by_account(&self) -> AppResult<Vec<(Uuid, i64)>>;

    /// Count Active enrollments grouped by course, for reconciliation.
    async fn active_counts_by_course(&self) -> AppResult<Vec<(Uuid, i64)>>;
}
