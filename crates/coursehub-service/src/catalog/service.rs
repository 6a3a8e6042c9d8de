//! Catalog management with ownership enforcement.
//!
//! Mutations require the acting account to own the course or be an
//! admin. Video ordering is delegated to the store, which keeps each
//! chapter's sequence dense and 1-based across inserts and deletes.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_database::store::CatalogStore;
use coursehub_entity::account::Account;
use coursehub_entity::course::{
    Chapter, Course, CreateChapter, CreateCourse, CreateVideo, Video, VideoStatus,
};

/// Manages the course/chapter/video tree.
#[derive(Clone)]
pub struct CatalogService {
    /// Catalog persistence.
    catalog: Arc<dyn CatalogStore>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish()
    }
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Creates a course owned by the acting instructor.
    pub async fn create_course(
        &self,
        actor: &Account,
        title: &str,
        description: Option<String>,
        price: i64,
    ) -> Result<Course, AppError> {
        if !actor.role.is_instructor() && !actor.role.is_admin() {
            return Err(AppError::forbidden("Only instructors can create courses"));
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Course title must not be empty"));
        }
        if price < 0 {
            return Err(AppError::validation("Course price must not be negative"));
        }

        let course = self
            .catalog
            .create_course(&CreateCourse {
                title: title.to_string(),
                description,
                price,
                instructor_id: actor.id,
            })
            .await?;

        info!(course_id = %course.id, instructor_id = %actor.id, "Course created");
        Ok(course)
    }

    /// Publishes or unpublishes a course.
    pub async fn set_published(
        &self,
        actor: &Account,
        course_id: Uuid,
        published: bool,
    ) -> Result<(), AppError> {
        self.require_owner(actor, course_id).await?;
        self.catalog.set_published(course_id, published).await?;
        info!(course_id = %course_id, published, "Course visibility changed");
        Ok(())
    }

    /// Adds a chapter at the end of the course.
    pub async fn add_chapter(
        &self,
        actor: &Account,
        course_id: Uuid,
        title: &str,
    ) -> Result<Chapter, AppError> {
        self.require_owner(actor, course_id).await?;
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Chapter title must not be empty"));
        }

        self.catalog
            .create_chapter(&CreateChapter {
                course_id,
                title: title.to_string(),
            })
            .await
    }

    /// Adds a video at the end of its chapter's sequence. The store
    /// assigns the next dense position; callers never pick one.
    pub async fn add_video(
        &self,
        actor: &Account,
        chapter_id: Uuid,
        title: &str,
        media_id: &str,
        is_preview: bool,
    ) -> Result<Video, AppError> {
        let chapter = self
            .catalog
            .find_chapter(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter not found"))?;
        self.require_owner(actor, chapter.course_id).await?;

        if title.trim().is_empty() {
            return Err(AppError::validation("Video title must not be empty"));
        }
        if media_id.trim().is_empty() {
            return Err(AppError::validation("Video media id must not be empty"));
        }

        let video = self
            .catalog
            .create_video(&CreateVideo {
                course_id: chapter.course_id,
                chapter_id,
                title: title.trim().to_string(),
                media_id: media_id.trim().to_string(),
                is_preview,
            })
            .await?;

        info!(
            video_id = %video.id,
            chapter_id = %chapter_id,
            sort_order = video.sort_order,
            "Video added"
        );
        Ok(video)
    }

    /// Removes a video; the chapter's remaining sequence stays dense.
    pub async fn remove_video(&self, actor: &Account, video_id: Uuid) -> Result<(), AppError> {
        let video = self
            .catalog
            .find_video(video_id)
            .await?
            .ok_or_else(|| AppError::not_found("Video not found"))?;
        self.require_owner(actor, video.course_id).await?;

        let deleted = self.catalog.delete_video(video_id).await?;
        if !deleted {
            return Err(AppError::not_found("Video not found"));
        }

        info!(video_id = %video_id, "Video removed");
        Ok(())
    }

    /// Records the processing status reported by the media host.
    pub async fn mark_video_status(
        &self,
        video_id: Uuid,
        status: VideoStatus,
    ) -> Result<(), AppError> {
        let video = self
            .catalog
            .find_video(video_id)
            .await?
            .ok_or_else(|| AppError::not_found("Video not found"))?;
        self.catalog.set_video_status(video.id, status).await?;
        info!(video_id = %video_id, status = ?status, "Video status updated");
        Ok(())
    }

    /// Lists a chapter's videos in playback order.
    pub async fn list_videos(&self, chapter_id: Uuid) -> Result<Vec<Video>, AppError> {
        self.catalog.list_chapter_videos(chapter_id).await
    }

    async fn require_owner(&self, actor: &Account, course_id: Uuid) -> Result<Course, AppError> {
        let course = self
            .catalog
            .find_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))?;

        if !actor.role.is_admin() && !course.is_owned_by(actor.id) {
            return Err(AppError::forbidden("You do not own this course"));
        }
        Ok(course)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_core::error::ErrorKind;
    use coursehub_database::memory::MemoryStore;
    use coursehub_database::store::CredentialStore;
    use coursehub_entity::account::{AccountRole, CreateAccount};

    struct Fixture {
        service: CatalogService,
        instructor: Account,
        student: Account,
        chapter: Chapter,
        course: Course,
    }

    async fn account(store: &MemoryStore, name: &str, role: AccountRole) -> Account {
        store
            .create_account(&CreateAccount {
                user_name: name.to_string(),
                email: format!("{name}@example.com"),
                password_hash: "$argon2id$...".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let service = CatalogService::new(store.clone());

        let instructor = account(&store, "instructor", AccountRole::Instructor).await;
        let student = account(&store, "student", AccountRole::Student).await;

        let course = service
            .create_course(&instructor, "Operating Systems", None, 7900)
            .await
            .unwrap();
        let chapter = service
            .add_chapter(&instructor, course.id, "Processes")
            .await
            .unwrap();

        Fixture {
            service,
            instructor,
            student,
            chapter,
            course,
        }
    }

    async fn add(f: &Fixture, title: &str) -> Video {
        f.service
            .add_video(&f.instructor, f.chapter.id, title, &format!("asset-{title}"), false)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_students_cannot_create_courses() {
        let f = fixture().await;
        let err = f
            .service
            .create_course(&f.student, "Hacking", None, 100)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_only_the_owner_mutates() {
        let f = fixture().await;
        let err = f
            .service
            .add_chapter(&f.student, f.course.id, "Threads")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let err = f
            .service
            .set_published(&f.student, f.course.id, true)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_videos_are_appended_densely() {
        let f = fixture().await;
        let a = add(&f, "one").await;
        let b = add(&f, "two").await;
        let c = add(&f, "three").await;

        assert_eq!(a.sort_order, 1);
        assert_eq!(b.sort_order, 2);
        assert_eq!(c.sort_order, 3);
    }

    #[tokio::test]
    async fn test_delete_closes_the_gap() {
        let f = fixture().await;
        add(&f, "one").await;
        let middle = add(&f, "two").await;
        add(&f, "three").await;

        f.service.remove_video(&f.instructor, middle.id).await.unwrap();

        let remaining = f.service.list_videos(f.chapter.id).await.unwrap();
        let orders: Vec<i32> = remaining.iter().map(|v| v.sort_order).collect();
        assert_eq!(orders, vec![1, 2]);

        let next = add(&f, "four").await;
        assert_eq!(next.sort_order, 3);
    }

    #[tokio::test]
    async fn test_new_videos_start_processing() {
        let f = fixture().await;
        let video = add(&f, "one").await;
        assert_eq!(video.status, VideoStatus::Processing);

        f.service
            .mark_video_status(video.id, VideoStatus::Ready)
            .await
            .unwrap();
        let listed = f.service.list_videos(f.chapter.id).await.unwrap();
        assert_eq!(listed[0].status, VideoStatus::Ready);
    }
}
