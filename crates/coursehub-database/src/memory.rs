//! In-memory store using a Tokio mutex, for development and unit tests.
//!
//! Implements all three store traits over one locked state so the atomic
//! conditional-update semantics of the PostgreSQL repositories hold here
//! too: every trait method takes the lock once and applies its whole
//! read-check-write sequence under it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_entity::account::{Account, CreateAccount};
use coursehub_entity::course::{
    Chapter, Course, CreateChapter, CreateCourse, CreateVideo, Video, VideoStatus,
};
use coursehub_entity::enrollment::{CreateEnrollment, Enrollment, EnrollmentStatus};

use crate::store::{CatalogStore, CredentialStore, EnrollmentStore};

/// Internal state for the memory store.
#[derive(Debug, Default)]
struct InnerState {
    accounts: HashMap<Uuid, Account>,
    courses: HashMap<Uuid, Course>,
    chapters: HashMap<Uuid, Chapter>,
    videos: HashMap<Uuid, Video>,
    enrollments: HashMap<Uuid, Enrollment>,
}

/// In-memory backing store. Suitable for single-node development and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemoryStore {
    /// Creates a new, empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_account(&self, id: Uuid) -> AppResult<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let state = self.state.lock().await;
        let email = email.to_lowercase();
        Ok(state
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create_account(&self, data: &CreateAccount) -> AppResult<Account> {
        let mut state = self.state.lock().await;
        let email = data.email.to_lowercase();

        if state.accounts.values().any(|a| a.email == email) {
            return Err(AppError::conflict("Email already exists"));
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            user_name: data.user_name.clone(),
            email,
            password_hash: data.password_hash.clone(),
            role: data.role,
            is_blocked: false,
            current_session_token: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            courses_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn set_session_token(&self, account_id: Uuid, token: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::not_found(format!("Account {account_id} not found")))?;
        account.current_session_token = Some(token.to_string());
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn clear_session_token(&self, token: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        for account in state.accounts.values_mut() {
            if account.current_session_token.as_deref() == Some(token) {
                account.current_session_token = None;
                account.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    async fn set_recovery_token(
        &self,
        account_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::not_found(format!("Account {account_id} not found")))?;
        account.reset_token_hash = Some(token_hash.to_string());
        account.reset_token_expires_at = Some(expires_at);
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn take_account_by_recovery_token(
        &self,
        token_hash: &str,
    ) -> AppResult<Option<Account>> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let account = state.accounts.values_mut().find(|a| {
            a.reset_token_hash.as_deref() == Some(token_hash)
                && a.reset_token_expires_at.is_some_and(|exp| exp > now)
        });

        Ok(account.map(|a| {
            a.reset_token_hash = None;
            a.reset_token_expires_at = None;
            a.updated_at = now;
            a.clone()
        }))
    }

    async fn update_password(&self, account_id: Uuid, password_hash: &str) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::not_found(format!("Account {account_id} not found")))?;
        account.password_hash = password_hash.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn set_blocked(&self, account_id: Uuid, blocked: bool) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::not_found(format!("Account {account_id} not found")))?;
        account.is_blocked = blocked;
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn adjust_courses_count(&self, account_id: Uuid, delta: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| AppError::not_found(format!("Account {account_id} not found")))?;
        account.courses_count = (account.courses_count + delta).max(0);
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn list_courses_counts(&self) -> AppResult<Vec<(Uuid, i64)>> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .map(|a| (a.id, a.courses_count))
            .collect())
    }

    async fn set_courses_count(&self, account_id: Uuid, value: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(account) = state.accounts.get_mut(&account_id) {
            account.courses_count = value;
            account.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_course(&self, id: Uuid) -> AppResult<Option<Course>> {
        let state = self.state.lock().await;
        Ok(state.courses.get(&id).cloned())
    }

    async fn create_course(&self, data: &CreateCourse) -> AppResult<Course> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            description: data.description.clone(),
            price: data.price,
            instructor_id: data.instructor_id,
            is_published: false,
            students_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn set_published(&self, course_id: Uuid, published: bool) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let course = state
            .courses
            .get_mut(&course_id)
            .ok_or_else(|| AppError::not_found(format!("Course {course_id} not found")))?;
        course.is_published = published;
        course.updated_at = Utc::now();
        Ok(())
    }

    async fn adjust_students_count(&self, course_id: Uuid, delta: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let course = state
            .courses
            .get_mut(&course_id)
            .ok_or_else(|| AppError::not_found(format!("Course {course_id} not found")))?;
        course.students_count = (course.students_count + delta).max(0);
        course.updated_at = Utc::now();
        Ok(())
    }

    async fn list_students_counts(&self) -> AppResult<Vec<(Uuid, i64)>> {
        let state = self.state.lock().await;
        Ok(state
            .courses
            .values()
            .map(|c| (c.id, c.students_count))
            .collect())
    }

    async fn set_students_count(&self, course_id: Uuid, value: i64) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(course) = state.courses.get_mut(&course_id) {
            course.students_count = value;
            course.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn create_chapter(&self, data: &CreateChapter) -> AppResult<Chapter> {
        let mut state = self.state.lock().await;
        let position = state
            .chapters
            .values()
            .filter(|c| c.course_id == data.course_id)
            .map(|c| c.position)
            .max()
            .unwrap_or(0)
            + 1;
        let chapter = Chapter {
            id: Uuid::new_v4(),
            course_id: data.course_id,
            title: data.title.clone(),
            position,
            created_at: Utc::now(),
        };
        state.chapters.insert(chapter.id, chapter.clone());
        Ok(chapter)
    }

    async fn find_chapter(&self, id: Uuid) -> AppResult<Option<Chapter>> {
        let state = self.state.lock().await;
        Ok(state.chapters.get(&id).cloned())
    }

    async fn create_video(&self, data: &CreateVideo) -> AppResult<Video> {
        let mut state = self.state.lock().await;
        let sort_order = state
            .videos
            .values()
            .filter(|v| v.chapter_id == data.chapter_id)
            .map(|v| v.sort_order)
            .max()
            .unwrap_or(0)
            + 1;
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            course_id: data.course_id,
            chapter_id: data.chapter_id,
            title: data.title.clone(),
            media_id: data.media_id.clone(),
            duration_seconds: 0,
            sort_order,
            is_preview: data.is_preview,
            status: VideoStatus::Processing,
            created_at: now,
            updated_at: now,
        };
        state.videos.insert(video.id, video.clone());
        Ok(video)
    }

    async fn find_video(&self, id: Uuid) -> AppResult<Option<Video>> {
        let state = self.state.lock().await;
        Ok(state.videos.get(&id).cloned())
    }

    async fn list_chapter_videos(&self, chapter_id: Uuid) -> AppResult<Vec<Video>> {
        let state = self.state.lock().await;
        let mut videos: Vec<Video> = state
            .videos
            .values()
            .filter(|v| v.chapter_id == chapter_id)
            .cloned()
            .collect();
        videos.sort_by_key(|v| v.sort_order);
        Ok(videos)
    }

    async fn delete_video(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let Some(removed) = state.videos.remove(&id) else {
            return Ok(false);
        };

        for video in state.videos.values_mut() {
            if video.chapter_id == removed.chapter_id && video.sort_order > removed.sort_order {
                video.sort_order -= 1;
                video.updated_at = Utc::now();
            }
        }
        Ok(true)
    }

    async fn set_video_status(&self, id: Uuid, status: VideoStatus) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let video = state
            .videos
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Video {id} not found")))?;
        video.status = status;
        video.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn create(&self, data: &CreateEnrollment) -> AppResult<Enrollment> {
        let mut state = self.state.lock().await;

        if state
            .enrollments
            .values()
            .any(|e| e.account_id == data.account_id && e.course_id == data.course_id)
        {
            return Err(AppError::conflict(
                "Account is already enrolled in this course",
            ));
        }

        let now = Utc::now();
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            account_id: data.account_id,
            course_id: data.course_id,
            status: EnrollmentStatus::Pending,
            proof_url: data.proof.url.clone(),
            proof_file_id: data.proof.file_id.clone(),
            decided_at: None,
            created_at: now,
            updated_at: now,
        };
        state.enrollments.insert(enrollment.id, enrollment.clone());
        Ok(enrollment)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Enrollment>> {
        let state = self.state.lock().await;
        Ok(state.enrollments.get(&id).cloned())
    }

    async fn find_by_account_course(
        &self,
        account_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Enrollment>> {
        let state = self.state.lock().await;
        Ok(state
            .enrollments
            .values()
            .find(|e| e.account_id == account_id && e.course_id == course_id)
            .cloned())
    }

    async fn transition(
        &self,
        id: Uuid,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> AppResult<Option<Enrollment>> {
        let mut state = self.state.lock().await;
        let Some(enrollment) = state.enrollments.get_mut(&id) else {
            return Ok(None);
        };
        if enrollment.status != from {
            return Ok(None);
        }

        let now = Utc::now();
        enrollment.status = to;
        if from == EnrollmentStatus::Pending {
            enrollment.decided_at = Some(now);
        }
        enrollment.updated_at = now;
        Ok(Some(enrollment.clone()))
    }

    async fn list_by_account(&self, account_id: Uuid) -> AppResult<Vec<Enrollment>> {
        let state = self.state.lock().await;
        let mut enrollments: Vec<Enrollment> = state
            .enrollments
            .values()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect();
        enrollments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(enrollments)
    }

    async fn active_counts_by_account(&self) -> AppResult<Vec<(Uuid, i64)>> {
        let state = self.state.lock().await;
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for e in state.enrollments.values() {
            if e.status == EnrollmentStatus::Active {
                *counts.entry(e.account_id).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn active_counts_by_course(&self) -> AppResult<Vec<(Uuid, i64)>> {
        let state = self.state.lock().await;
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for e in state.enrollments.values() {
            if e.status == EnrollmentStatus::Active {
                *counts.entry(e.course_id).or_insert(0) += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursehub_entity::account::AccountRole;
    use coursehub_entity::enrollment::ProofArtifact;

    fn new_account(name: &str) -> CreateAccount {
        CreateAccount {
            user_name: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "$argon2id$...".to_string(),
            role: AccountRole::Student,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = MemoryStore::new();
        store.create_account(&new_account("amina")).await.unwrap();
        let err = store.create_account(&new_account("amina")).await.unwrap_err();
        assert_eq!(err.kind, coursehub_core::error::ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_video_order_stays_dense_across_delete() {
        let store = MemoryStore::new();
        let instructor = Uuid::new_v4();
        let course = store
            .create_course(&CreateCourse {
                title: "Rust 101".to_string(),
                description: None,
                price: 0,
                instructor_id: instructor,
            })
            .await
            .unwrap();
        let chapter = store
            .create_chapter(&CreateChapter {
                course_id: course.id,
                title: "Basics".to_string(),
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for i in 0..4 {
            let video = store
                .create_video(&CreateVideo {
                    course_id: course.id,
                    chapter_id: chapter.id,
                    title: format!("Lesson {i}"),
                    media_id: format!("media-{i}"),
                    is_preview: false,
                })
                .await
                .unwrap();
            ids.push(video.id);
        }

        assert!(store.delete_video(ids[1]).await.unwrap());

        let videos = store.list_chapter_videos(chapter.id).await.unwrap();
        let orders: Vec<i32> = videos.iter().map(|v| v.sort_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_transition_cas_succeeds_once() {
        let store = MemoryStore::new();
        let enrollment = store
            .create(&CreateEnrollment {
                account_id: Uuid::new_v4(),
                course_id: Uuid::new_v4(),
                proof: ProofArtifact {
                    url: "https://files.example.com/r.png".to_string(),
                    file_id: "r1".to_string(),
                },
            })
            .await
            .unwrap();

        let first = store
            .transition(enrollment.id, EnrollmentStatus::Pending, EnrollmentStatus::Active)
            .await
            .unwrap();
        assert_eq!(first.unwrap().status, EnrollmentStatus::Active);

        let second = store
            .transition(enrollment.id, EnrollmentStatus::Pending, EnrollmentStatus::Active)
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_recovery_token_is_single_use() {
        let store = MemoryStore::new();
        let account = store.create_account(&new_account("badr")).await.unwrap();
        let expires = Utc::now() + chrono::Duration::minutes(10);
        store
            .set_recovery_token(account.id, "hash-1", expires)
            .await
            .unwrap();

        assert!(store
            .take_account_by_recovery_token("hash-1")
            .await
            .unwrap()
            .is_some());
        assert!(store
            .take_account_by_recovery_token("hash-1")
            .await
            .unwrap()
            .is_none());
    }
}
