//! Playback authorization.
//!
//! The only path to a signed playback token runs through the access
//! policy engine; a denial never reaches the signer.

use tracing::{debug, info};
use uuid::Uuid;

use coursehub_auth::access::AccessPolicyEngine;
use coursehub_auth::signing::{SignedMediaUrlIssuer, SignedPlayback};
use coursehub_core::error::AppError;
use coursehub_entity::account::Account;
use coursehub_entity::course::VideoStatus;

/// Issues signed playback grants for authorized subjects.
#[derive(Clone)]
pub struct PlaybackService {
    /// Access policy evaluation.
    policy: AccessPolicyEngine,
    /// Playback token signing.
    issuer: SignedMediaUrlIssuer,
}

impl std::fmt::Debug for PlaybackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackService").finish()
    }
}

impl PlaybackService {
    /// Creates a new playback service.
    pub fn new(policy: AccessPolicyEngine, issuer: SignedMediaUrlIssuer) -> Self {
        Self { policy, issuer }
    }

    /// Authorizes the subject for the video and, on a grant, signs a
    /// playback token for the video's media asset.
    ///
    /// Videos that are still processing (or failed) are not playable
    /// even for subjects the policy would admit.
    pub async fn authorize_playback(
        &self,
        subject: &Account,
        video_id: Uuid,
    ) -> Result<SignedPlayback, AppError> {
        let video = self.policy.authorize(subject, video_id).await?;

        if video.status != VideoStatus::Ready {
            debug!(video_id = %video.id, status = ?video.status, "Video not playable yet");
            return Err(AppError::validation("Video is not ready for playback"));
        }

        let grant = self.issuer.sign(&video.media_id);
        info!(
            account_id = %subject.id,
            video_id = %video.id,
            expires = grant.expires,
            "Playback token issued"
        );
        Ok(grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use coursehub_core::config::media::MediaConfig;
    use coursehub_core::error::ErrorKind;
    use coursehub_database::memory::MemoryStore;
    use coursehub_database::store::{CatalogStore, CredentialStore, EnrollmentStore};
    use coursehub_entity::account::{AccountRole, CreateAccount};
    use coursehub_entity::course::{CreateChapter, CreateCourse, CreateVideo};
    use coursehub_entity::enrollment::{CreateEnrollment, EnrollmentStatus, ProofArtifact};

    struct Fixture {
        service: PlaybackService,
        store: Arc<MemoryStore>,
        instructor: Account,
        student: Account,
        admin: Account,
        course_id: Uuid,
        video_id: Uuid,
        preview_id: Uuid,
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
        let policy = AccessPolicyEngine::new(store.clone(), store.clone());
        let issuer = SignedMediaUrlIssuer::from_config(&MediaConfig {
            token_key: "shared-edge-key".to_string(),
            ..MediaConfig::default()
        })
        .unwrap();
        let service = PlaybackService::new(policy, issuer);

        let instructor = account(&store, "instructor", AccountRole::Instructor).await;
        let student = account(&store, "student", AccountRole::Student).await;
        let admin = account(&store, "admin", AccountRole::Admin).await;

        let course = store
            .create_course(&CreateCourse {
                title: "Networking".to_string(),
                description: None,
                price: 5900,
                instructor_id: instructor.id,
            })
            .await
            .unwrap();
        store.set_published(course.id, true).await.unwrap();

        let chapter = store
            .create_chapter(&CreateChapter {
                course_id: course.id,
                title: "Basics".to_string(),
            })
            .await
            .unwrap();

        let video = store
            .create_video(&CreateVideo {
                course_id: course.id,
                chapter_id: chapter.id,
                title: "Sockets".to_string(),
                media_id: "asset-sockets".to_string(),
                is_preview: false,
            })
            .await
            .unwrap();
        store.set_video_status(video.id, VideoStatus::Ready).await.unwrap();

        let preview = store
            .create_video(&CreateVideo {
                course_id: course.id,
                chapter_id: chapter.id,
                title: "Intro".to_string(),
                media_id: "asset-intro".to_string(),
                is_preview: true,
            })
            .await
            .unwrap();
        store.set_video_status(preview.id, VideoStatus::Ready).await.unwrap();

        Fixture {
            service,
            store,
            instructor,
            student,
            admin,
            course_id: course.id,
            video_id: video.id,
            preview_id: preview.id,
        }
    }

    async fn activate_enrollment(f: &Fixture) {
        let enrollment = f
            .store
            .create(&CreateEnrollment {
                account_id: f.student.id,
                course_id: f.course_id,
                proof: ProofArtifact {
                    url: "https://files.example.com/proof.png".to_string(),
                    file_id: "file-1".to_string(),
                },
            })
            .await
            .unwrap();
        f.store
            .transition(enrollment.id, EnrollmentStatus::Pending, EnrollmentStatus::Active)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_unenrolled_student_is_forbidden() {
        let f = fixture().await;
        let err = f
            .service
            .authorize_playback(&f.student, f.video_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(err.message, "You must be enrolled to watch this video");
    }

    #[tokio::test]
    async fn test_enrolled_student_gets_a_grant() {
        let f = fixture().await;
        activate_enrollment(&f).await;

        let grant = f
            .service
            .authorize_playback(&f.student, f.video_id)
            .await
            .unwrap();
        assert_eq!(grant.video_id, "asset-sockets");
        assert_eq!(grant.token.len(), 64);
    }

    #[tokio::test]
    async fn test_owner_and_admin_bypass_enrollment() {
        let f = fixture().await;
        assert!(f.service.authorize_playback(&f.instructor, f.video_id).await.is_ok());
        assert!(f.service.authorize_playback(&f.admin, f.video_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_preview_is_open_without_enrollment() {
        let f = fixture().await;
        let grant = f
            .service
            .authorize_playback(&f.student, f.preview_id)
            .await
            .unwrap();
        assert_eq!(grant.video_id, "asset-intro");
    }

    #[tokio::test]
    async fn test_processing_video_is_not_playable() {
        let f = fixture().await;
        f.store
            .set_video_status(f.video_id, VideoStatus::Processing)
            .await
            .unwrap();

        let err = f
            .service
            .authorize_playback(&f.admin, f.video_id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_video_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .authorize_playback(&f.admin, Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
