//! Video entity model and processing status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Processing state reported by the downstream media host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "video_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// Upload received, transcoding in progress.
    Processing,
    /// Playable.
    Ready,
    /// Transcoding failed.
    Failed,
}

/// A video belonging to exactly one course and one chapter.
///
/// `sort_order` is a dense 1-based sequence within the chapter: no gaps,
/// no duplicates. `media_id` identifies the asset at the downstream media
/// host and is the value bound into signed playback tokens.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    /// Unique video identifier.
    pub id: Uuid,
    /// The owning course.
    pub course_id: Uuid,
    /// The owning chapter.
    pub chapter_id: Uuid,
    /// Video title.
    pub title: String,
    /// Asset identifier at the downstream media host.
    pub media_id: String,
    /// Duration in seconds (0 until processing completes).
    pub duration_seconds: i32,
    /// 1-based position within the chapter.
    pub sort_order: i32,
    /// Viewable without enrollment when true.
    pub is_preview: bool,
    /// Processing status.
    pub status: VideoStatus,
    /// When the video was created.
    pub created_at: DateTime<Utc>,
    /// When the video was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new video entry.
///
/// `sort_order` is assigned by the store, not the caller, to keep the
/// per-chapter sequence dense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideo {
    /// The owning course.
    pub course_id: Uuid,
    /// The owning chapter.
    pub chapter_id: Uuid,
    /// Video title.
    pub title: String,
    /// Asset identifier at the downstream media host.
    pub media_id: String,
    /// Viewable without enrollment when true.
    pub is_preview: bool,
}
