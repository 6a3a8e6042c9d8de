//! Shared test helpers for integration tests.

use std::sync::Arc;

use coursehub_auth::access::AccessPolicyEngine;
use coursehub_auth::session::SessionTokenAuthority;
use coursehub_auth::signing::SignedMediaUrlIssuer;
use coursehub_core::config::auth::AuthConfig;
use coursehub_core::config::media::MediaConfig;
use coursehub_database::memory::MemoryStore;
use coursehub_database::store::CatalogStore;
use coursehub_entity::account::{Account, AccountRole};
use coursehub_entity::course::{Chapter, Course, Video, VideoStatus};
use coursehub_entity::enrollment::ProofArtifact;
use coursehub_service::catalog::CatalogService;
use coursehub_service::enrollment::{CounterReconciler, EnrollmentLifecycle};
use coursehub_service::playback::PlaybackService;

/// Test application context wiring every service over one store.
pub struct TestApp {
    /// Shared in-memory store, also usable for direct state checks.
    pub store: Arc<MemoryStore>,
    /// Session token authority.
    pub authority: SessionTokenAuthority,
    /// Catalog management.
    pub catalog: CatalogService,
    /// Enrollment lifecycle.
    pub lifecycle: EnrollmentLifecycle,
    /// Playback authorization.
    pub playback: PlaybackService,
    /// Counter reconciler.
    pub reconciler: CounterReconciler,
}

impl TestApp {
    /// Create a new test application.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let auth_config = AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            ..AuthConfig::default()
        };
        let media_config = MediaConfig {
            token_key: "integration-test-media-key".to_string(),
            ..MediaConfig::default()
        };

        let authority = SessionTokenAuthority::new(auth_config, store.clone());
        let policy = AccessPolicyEngine::new(store.clone(), store.clone());
        let issuer = SignedMediaUrlIssuer::from_config(&media_config).unwrap();
        let playback = PlaybackService::new(policy, issuer);
        let catalog = CatalogService::new(store.clone());
        let lifecycle = EnrollmentLifecycle::new(store.clone(), store.clone(), store.clone());
        let reconciler = CounterReconciler::new(store.clone(), store.clone(), store.clone());

        Self {
            store,
            authority,
            catalog,
            lifecycle,
            playback,
            reconciler,
        }
    }

    /// Register an account with the given role.
    pub async fn create_account(&self, name: &str, role: AccountRole) -> Account {
        self.authority
            .register(name, &format!("{name}@example.com"), "password123", role)
            .await
            .expect("Failed to register account")
    }

    /// Create a published course with one chapter and one Ready,
    /// non-preview video.
    pub async fn create_course_with_video(
        &self,
        instructor: &Account,
    ) -> (Course, Chapter, Video) {
        let course = self
            .catalog
            .create_course(instructor, "Test Course", None, 4900)
            .await
            .expect("Failed to create course");
        self.catalog
            .set_published(instructor, course.id, true)
            .await
            .expect("Failed to publish course");

        let chapter = self
            .catalog
            .add_chapter(instructor, course.id, "Chapter 1")
            .await
            .expect("Failed to add chapter");

        let video = self
            .catalog
            .add_video(instructor, chapter.id, "Lesson 1", "asset-lesson-1", false)
            .await
            .expect("Failed to add video");
        self.store
            .set_video_status(video.id, VideoStatus::Ready)
            .await
            .expect("Failed to mark video ready");

        let video = self
            .store
            .find_video(video.id)
            .await
            .unwrap()
            .expect("Video vanished");
        (course, chapter, video)
    }

    /// Default payment proof for enrollment requests.
    pub fn proof() -> ProofArtifact {
        ProofArtifact {
            url: "https://files.example.com/proof.png".to_string(),
            file_id: "proof-file-1".to_string(),
        }
    }
}
