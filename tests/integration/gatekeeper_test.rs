//! Integration tests for the pre-render gatekeeper.

mod helpers;

use http::StatusCode;

use estate_core::error::ErrorKind;

use helpers::TestApp;

fn remaining_seconds(page: &str) -> i64 {
    let marker = "data-session-remaining=\"";
    let start = page.find(marker).expect("session marker") + marker.len();
    let end = start + page[start..].find('"').expect("closing quote");
    page[start..end].parse().expect("numeric remaining seconds")
}

#[tokio::test]
async fn test_four_minute_token_is_refreshed_then_left_alone() {
    let app = TestApp::new();
    let cookie = app.session_cookie(4 * 60);

    let first = app.navigate("/", Some(&cookie)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(app.authority.refresh_calls(), 1);
    assert_eq!(first.set_cookies().len(), 2);
    assert_eq!(first.cookie_value("refresh_token").as_deref(), Some("refresh-1"));
    // The page rendered with the rotated access token.
    assert!(remaining_seconds(&first.text) > 5 * 60);

    let second = app.navigate("/", Some(&first.replay_cookies())).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(app.authority.refresh_calls(), 1);
    assert!(second.set_cookies().is_empty());
}

#[tokio::test]
async fn test_six_minute_token_is_not_refreshed() {
    let app = TestApp::new();
    let response = app.navigate("/", Some(&app.session_cookie(6 * 60))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.authority.refresh_calls(), 0);
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_cookie_attributes_outside_production() {
    let app = TestApp::new();
    let response = app.navigate("/", Some(&app.session_cookie(60))).await;

    let access = response.set_cookie("access_token").unwrap();
    let refresh = response.set_cookie("refresh_token").unwrap();
    for cookie in [&access, &refresh] {
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }
    assert!(access.contains("Max-Age=900"));
    assert!(refresh.contains("Max-Age=604800"));
}

#[tokio::test]
async fn test_cookies_are_secure_in_production() {
    let mut config = estate_core::config::AppConfig::default();
    config.environment = "production".to_string();
    let app = TestApp::with_config(config);

    let response = app.navigate("/", Some(&app.session_cookie(60))).await;
    assert_eq!(response.set_cookies().len(), 2);
    assert!(response.set_cookies().iter().all(|c| c.contains("Secure")));
}

#[tokio::test]
async fn test_no_refresh_cookie_redirects_to_login() {
    let app = TestApp::new();
    let response = app.navigate("/?tab=listings", None).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("/login?returnTo=%2F%3Ftab%3Dlistings"));
    assert_eq!(app.authority.refresh_calls(), 0);
}

#[tokio::test]
async fn test_login_page_and_relay_are_exempt() {
    let app = TestApp::new();

    let login = app.navigate("/login", None).await;
    assert_eq!(login.status, StatusCode::OK);
    assert!(login.text.contains("<form"));

    let expiring = app.session_cookie(30);
    let relay = app
        .request("POST", "/api/auth/refresh", None, Some(&expiring))
        .await;
    assert_eq!(relay.status, StatusCode::OK);
    // One call from the relay itself; the gatekeeper stayed out of the way.
    assert_eq!(app.authority.refresh_calls(), 1);

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["data"]["status"], "ok");
    assert_eq!(health.body["data"]["secure_cookies"], false);
}

#[tokio::test]
async fn test_authority_outage_still_renders_page() {
    let app = TestApp::new();
    app.authority.fail_with(ErrorKind::ExternalService);

    let response = app.navigate("/", Some(&app.session_cookie(60))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.authority.refresh_calls(), 1);
    assert!(response.set_cookies().is_empty());
}

#[tokio::test]
async fn test_revoked_refresh_token_still_renders_page() {
    let app = TestApp::new();
    let cookie = format!(
        "access_token={}; refresh_token=stolen",
        app.authority.access_token_expiring_in(60)
    );

    let response = app.navigate("/", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.set_cookies().is_empty());
}
