//! Integration tests for the same-origin auth relay.

mod helpers;

use http::StatusCode;

use estate_auth::testing::{FAKE_PASSWORD, FAKE_USERNAME};
use estate_core::error::ErrorKind;

use helpers::TestApp;

#[tokio::test]
async fn test_login_sets_both_cookies_and_returns_tokens() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": FAKE_USERNAME,
                "password": FAKE_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["expires_in"], 900);
    let access = response.body["access_token"].as_str().unwrap();
    let refresh = response.body["refresh_token"].as_str().unwrap();
    assert_eq!(response.cookie_value("access_token").as_deref(), Some(access));
    assert_eq!(response.cookie_value("refresh_token").as_deref(), Some(refresh));
}

#[tokio::test]
async fn test_login_rejects_bad_password() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "username": FAKE_USERNAME,
                "password": "wrong",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_login_validates_input() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({ "username": "", "password": "" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_refresh_with_body_token() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!({ "refresh_token": "r0" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["refresh_token"], "refresh-1");
    assert_eq!(response.cookie_value("refresh_token").as_deref(), Some("refresh-1"));
    assert!(response.set_cookie("access_token").is_some());
}

#[tokio::test]
async fn test_refresh_from_cookie_rotates_both() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/api/auth/refresh", None, Some("refresh_token=r0"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.set_cookies().len(), 2);
    assert_eq!(app.authority.valid_refresh_token(), "refresh-1");

    // The rotated-out token is dead.
    let replay = app
        .request("POST", "/api/auth/refresh", None, Some("refresh_token=r0"))
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rejected_refresh_clears_cookies() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            None,
            Some("access_token=stale; refresh_token=revoked"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert_eq!(response.cookie_value("access_token").as_deref(), Some(""));
    assert_eq!(response.cookie_value("refresh_token").as_deref(), Some(""));
}

#[tokio::test]
async fn test_refresh_without_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app.request("POST", "/api/auth/refresh", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.authority.refresh_calls(), 0);
}

#[tokio::test]
async fn test_refresh_authority_outage_keeps_cookies() {
    let app = TestApp::new();
    app.authority.fail_with(ErrorKind::ExternalService);
    let response = app
        .request("POST", "/api/auth/refresh", None, Some("refresh_token=r0"))
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_malformed_refresh_body_is_bad_request() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(serde_json::json!(["not", "an", "object"])),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/api/auth/logout", None, Some(&app.session_cookie(600)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["cleared"],
        serde_json::json!(["access_token", "refresh_token"])
    );
    assert_eq!(response.cookie_value("access_token").as_deref(), Some(""));
    assert_eq!(response.cookie_value("refresh_token").as_deref(), Some(""));
}
