//! Integration tests for the enrollment lifecycle and derived counters.

use coursehub_core::error::ErrorKind;
use coursehub_database::store::{CatalogStore, CredentialStore};
use coursehub_entity::account::AccountRole;
use coursehub_entity::enrollment::EnrollmentStatus;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_full_lifecycle_keeps_counters_in_step() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let student = app.create_account("student", AccountRole::Student).await;
    let (course, _chapter, _video) = app.create_course_with_video(&instructor).await;

    let enrollment = app
        .lifecycle
        .request(student.id, course.id, TestApp::proof())
        .await
        .unwrap();
    assert_eq!(enrollment.status, EnrollmentStatus::Pending);

    app.lifecycle.approve(enrollment.id).await.unwrap();
    let course_row = app.store.find_course(course.id).await.unwrap().unwrap();
    let student_row = app.store.find_account(student.id).await.unwrap().unwrap();
    assert_eq!(course_row.students_count, 1);
    assert_eq!(student_row.courses_count, 1);

    app.lifecycle.complete(enrollment.id).await.unwrap();
    let course_row = app.store.find_course(course.id).await.unwrap().unwrap();
    let student_row = app.store.find_account(student.id).await.unwrap().unwrap();
    assert_eq!(course_row.students_count, 0);
    assert_eq!(student_row.courses_count, 0);
}

#[tokio::test]
async fn test_double_decision_is_rejected() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let student = app.create_account("student", AccountRole::Student).await;
    let (course, _chapter, _video) = app.create_course_with_video(&instructor).await;

    let enrollment = app
        .lifecycle
        .request(student.id, course.id, TestApp::proof())
        .await
        .unwrap();
    app.lifecycle.approve(enrollment.id).await.unwrap();

    let err = app.lifecycle.approve(enrollment.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);
    let err = app.lifecycle.reject(enrollment.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidTransition);

    let course_row = app.store.find_course(course.id).await.unwrap().unwrap();
    assert_eq!(course_row.students_count, 1);
}

#[tokio::test]
async fn test_one_enrollment_per_pair() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let student = app.create_account("student", AccountRole::Student).await;
    let (course, _chapter, _video) = app.create_course_with_video(&instructor).await;

    app.lifecycle
        .request(student.id, course.id, TestApp::proof())
        .await
        .unwrap();
    let err = app
        .lifecycle
        .request(student.id, course.id, TestApp::proof())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_reconciler_repairs_tampered_counters() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let student = app.create_account("student", AccountRole::Student).await;
    let (course, _chapter, _video) = app.create_course_with_video(&instructor).await;

    let enrollment = app
        .lifecycle
        .request(student.id, course.id, TestApp::proof())
        .await
        .unwrap();
    app.lifecycle.approve(enrollment.id).await.unwrap();

    // Simulate drift left behind by a crash between swap and update.
    app.store.set_students_count(course.id, 9).await.unwrap();
    app.store.set_courses_count(student.id, 0).await.unwrap();

    let report = app.reconciler.reconcile().await.unwrap();
    assert!(report.drift_detected());

    let course_row = app.store.find_course(course.id).await.unwrap().unwrap();
    let student_row = app.store.find_account(student.id).await.unwrap().unwrap();
    assert_eq!(course_row.students_count, 1);
    assert_eq!(student_row.courses_count, 1);
}

#[tokio::test]
async fn test_instructor_cannot_enroll_in_own_course() {
    let app = TestApp::new();
    let instructor = app.create_account("instructor", AccountRole::Instructor).await;
    let (course, _chapter, _video) = app.create_course_with_video(&instructor).await;

    let err = app
        .lifecycle
        .request(instructor.id, course.id, TestApp::proof())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}
