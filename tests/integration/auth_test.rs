//! Integration tests for the authentication flow.

use coursehub_core::error::ErrorKind;
use coursehub_entity::account::AccountRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_login_validate() {
    let app = TestApp::new();
    app.create_account("alice", AccountRole::Student).await;

    let login = app
        .authority
        .login("alice@example.com", "password123")
        .await
        .unwrap();

    let account = app.authority.validate(&login.token).await.unwrap();
    assert_eq!(account.email, "alice@example.com");
    assert_eq!(account.role, AccountRole::Student);
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new();
    app.create_account("alice", AccountRole::Student).await;

    let err = app
        .authority
        .login("alice@example.com", "wrongpassword")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn test_second_device_signs_out_the_first() {
    let app = TestApp::new();
    app.create_account("alice", AccountRole::Student).await;

    let laptop = app
        .authority
        .login("alice@example.com", "password123")
        .await
        .unwrap();
    let phone = app
        .authority
        .login("alice@example.com", "password123")
        .await
        .unwrap();

    let err = app.authority.validate(&laptop.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::SessionSuperseded);
    assert!(app.authority.validate(&phone.token).await.is_ok());
}

#[tokio::test]
async fn test_logout_then_login_again() {
    let app = TestApp::new();
    app.create_account("alice", AccountRole::Student).await;

    let first = app
        .authority
        .login("alice@example.com", "password123")
        .await
        .unwrap();
    app.authority.logout(&first.token).await.unwrap();
    assert!(app.authority.validate(&first.token).await.is_err());

    let second = app
        .authority
        .login("alice@example.com", "password123")
        .await
        .unwrap();
    assert!(app.authority.validate(&second.token).await.is_ok());
}

#[tokio::test]
async fn test_password_recovery_flow() {
    let app = TestApp::new();
    app.create_account("alice", AccountRole::Student).await;

    let token = app
        .authority
        .start_recovery("alice@example.com")
        .await
        .unwrap()
        .expect("Known email must yield a token");

    app.authority
        .reset_password(&token, "brand-new-pass")
        .await
        .unwrap();

    // Old password out, new password in, token burned.
    assert!(app
        .authority
        .login("alice@example.com", "password123")
        .await
        .is_err());
    assert!(app
        .authority
        .login("alice@example.com", "brand-new-pass")
        .await
        .is_ok());
    assert!(app.authority.reset_password(&token, "again").await.is_err());
}
