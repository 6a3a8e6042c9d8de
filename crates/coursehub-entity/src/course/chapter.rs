//! Chapter entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A chapter grouping videos inside one course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chapter {
    /// Unique chapter identifier.
    pub id: Uuid,
    /// The owning course.
    pub course_id: Uuid,
    /// Chapter title.
    pub title: String,
    /// Position of the chapter within the course.
    pub position: i32,
    /// When the chapter was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a new chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChapter {
    /// The owning course.
    pub course_id: Uuid,
    /// Chapter title.
    pub title: String,
}
