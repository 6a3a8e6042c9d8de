//! Course catalog repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use coursehub_core::error::{AppError, ErrorKind};
use coursehub_core::result::AppResult;
use coursehub_entity::course::{
    Chapter, Course, CreateChapter, CreateCourse, CreateVideo, Video, VideoStatus,
};

use crate::store::CatalogStore;

/// Repository for courses and their chapter/video tree.
#[derive(Debug, Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Create a new course repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for CourseRepository {
    async fn find_course(&self, id: Uuid) -> AppResult<Option<Course>> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find course", e))
    }

    async fn create_course(&self, data: &CreateCourse) -> AppResult<Course> {
        sqlx::query_as::<_, Course>(
            "INSERT INTO courses (title, description, price, instructor_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.instructor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create course", e))
    }

    async fn set_published(&self, course_id: Uuid, published: bool) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE courses SET is_published = $2, updated_at = NOW() WHERE id = $1")
                .bind(course_id)
                .bind(published)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update course", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Course {course_id} not found")));
        }
        Ok(())
    }

    async fn adjust_students_count(&self, course_id: Uuid, delta: i64) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE courses SET students_count = GREATEST(students_count + $2, 0), \
                                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(course_id)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to adjust students_count", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Course {course_id} not found")));
        }
        Ok(())
    }

    async fn list_students_counts(&self) -> AppResult<Vec<(Uuid, i64)>> {
        sqlx::query_as::<_, (Uuid, i64)>("SELECT id, students_count FROM courses")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list students_counts", e)
            })
    }

    async fn set_students_count(&self, course_id: Uuid, value: i64) -> AppResult<()> {
        sqlx::query("UPDATE courses SET students_count = $2, updated_at = NOW() WHERE id = $1")
            .bind(course_id)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set students_count", e)
            })?;
        Ok(())
    }

    async fn create_chapter(&self, data: &CreateChapter) -> AppResult<Chapter> {
        sqlx::query_as::<_, Chapter>(
            "INSERT INTO chapters (course_id, title, position) \
             SELECT $1, $2, COALESCE(MAX(position), 0) + 1 FROM chapters WHERE course_id = $1 \
             RETURNING *",
        )
        .bind(data.course_id)
        .bind(&data.title)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create chapter", e))
    }

    async fn find_chapter(&self, id: Uuid) -> AppResult<Option<Chapter>> {
        sqlx::query_as::<_, Chapter>("SELECT * FROM chapters WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find chapter", e))
    }

    async fn create_video(&self, data: &CreateVideo) -> AppResult<Video> {
        // Assigning the order inside the INSERT keeps the per-chapter
        // sequence dense under concurrent inserts.
        sqlx::query_as::<_, Video>(
            "INSERT INTO videos (course_id, chapter_id, title, media_id, is_preview, sort_order) \
             SELECT $1, $2, $3, $4, $5, COALESCE(MAX(sort_order), 0) + 1 \
             FROM videos WHERE chapter_id = $2 \
             RETURNING *",
        )
        .bind(data.course_id)
        .bind(data.chapter_id)
        .bind(&data.title)
        .bind(&data.media_id)
        .bind(data.is_preview)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create video", e))
    }

    async fn find_video(&self, id: Uuid) -> AppResult<Option<Video>> {
        sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find video", e))
    }

    async fn list_chapter_videos(&self, chapter_id: Uuid) -> AppResult<Vec<Video>> {
        sqlx::query_as::<_, Video>(
            "SELECT * FROM videos WHERE chapter_id = $1 ORDER BY sort_order ASC",
        )
        .bind(chapter_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list videos", e))
    }

    async fn delete_video(&self, id: Uuid) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let deleted: Option<(Uuid, i32)> = sqlx::query_as(
            "DELETE FROM videos WHERE id = $1 RETURNING chapter_id, sort_order",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete video", e))?;

        let Some((chapter_id, sort_order)) = deleted else {
            return Ok(false);
        };

        // Close the gap so the chapter sequence stays dense.
        sqlx::query(
            "UPDATE videos SET sort_order = sort_order - 1 \
             WHERE chapter_id = $1 AND sort_order > $2",
        )
        .bind(chapter_id)
        .bind(sort_order)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reorder videos", e))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit video deletion", e)
        })?;
        Ok(true)
    }

    async fn set_video_status(&self, id: Uuid, status: VideoStatus) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE videos SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update video status", e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Video {id} not found")));
        }
        Ok(())
    }
}
