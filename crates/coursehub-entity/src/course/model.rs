//! Course entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A course owned by exactly one instructor.
///
/// `students_count` is a derived aggregate maintained by the enrollment
/// lifecycle and must always equal the number of Active enrollments for
/// this course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    /// Unique course identifier.
    pub id: Uuid,
    /// Course title.
    pub title: String,
    /// Course description.
    pub description: Option<String>,
    /// Price in the platform's base currency unit.
    pub price: i64,
    /// The owning instructor.
    pub instructor_id: Uuid,
    /// Whether the course is visible to students.
    pub is_published: bool,
    /// Number of Active enrollments in this course (derived).
    pub students_count: i64,
    /// When the course was created.
    pub created_at: DateTime<Utc>,
    /// When the course was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Check whether the given account owns this course.
    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.instructor_id == account_id
    }
}

/// Data required to create a new course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCourse {
    /// Course title.
    pub title: String,
    /// Course description.
    pub description: Option<String>,
    /// Price in the platform's base currency unit.
    pub price: i64,
    /// The owning instructor.
    pub instructor_id: Uuid,
}
