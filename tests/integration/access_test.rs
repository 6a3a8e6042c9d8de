//! Integration tests for video access and playback token issuance.

use coursehub_core::error::ErrorKind;
use coursehub_entity::account::AccountRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_unenrolled_student_cannot_watch() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let student = app.create_account("student", AccountRole::Student).await;
    let (_course, _chapter, video) = app.create_course_with_video(&instructor).await;

    let err = app
        .playback
        .authorize_playback(&student, video.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_approved_enrollment_unlocks_playback() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let student = app.create_account("student", AccountRole::Student).await;
    let (course, _chapter, video) = app.create_course_with_video(&instructor).await;

    let enrollment = app
        .lifecycle
        .request(student.id, course.id, TestApp::proof())
        .await
        .unwrap();

    // Pending does not grant access.
    assert!(app.playback.authorize_playback(&student, video.id).await.is_err());

    app.lifecycle.approve(enrollment.id).await.unwrap();

    let grant = app
        .playback
        .authorize_playback(&student, video.id)
        .await
        .unwrap();
    assert_eq!(grant.video_id, video.media_id);
    assert_eq!(grant.token.len(), 64);
}

#[tokio::test]
async fn test_refund_revokes_access() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let student = app.create_account("student", AccountRole::Student).await;
    let (course, _chapter, video) = app.create_course_with_video(&instructor).await;

    let enrollment = app
        .lifecycle
        .request(student.id, course.id, TestApp::proof())
        .await
        .unwrap();
    app.lifecycle.approve(enrollment.id).await.unwrap();
    assert!(app.playback.authorize_playback(&student, video.id).await.is_ok());

    app.lifecycle.refund(enrollment.id).await.unwrap();
    let err = app
        .playback
        .authorize_playback(&student, video.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_owner_and_admin_watch_without_enrollment() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let admin = app.create_account("admin", AccountRole::Admin).await;
    let (_course, _chapter, video) = app.create_course_with_video(&instructor).await;

    assert!(app.playback.authorize_playback(&instructor, video.id).await.is_ok());
    assert!(app.playback.authorize_playback(&admin, video.id).await.is_ok());
}

#[tokio::test]
async fn test_preview_video_is_open() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let student = app.create_account("student", AccountRole::Student).await;
    let (_course, chapter, _video) = app.create_course_with_video(&instructor).await;

    let preview = app
        .catalog
        .add_video(&instructor, chapter.id, "Free intro", "asset-intro", true)
        .await
        .unwrap();
    app.catalog
        .mark_video_status(preview.id, coursehub_entity::course::VideoStatus::Ready)
        .await
        .unwrap();

    let grant = app
        .playback
        .authorize_playback(&student, preview.id)
        .await
        .unwrap();
    assert_eq!(grant.video_id, "asset-intro");
}
