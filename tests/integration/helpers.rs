//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::header::{ACCEPT, CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use estate_api::{AppState, build_app};
use estate_auth::testing::FakeAuthority;
use estate_core::config::AppConfig;

/// Accept header of a browser navigation.
pub const HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Fake token authority behind the portal
    pub authority: Arc<FakeAuthority>,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// A portal whose authority accepts refresh token `r0`.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// A portal with a custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let authority = Arc::new(FakeAuthority::new("r0"));
        let state = AppState::new(config.clone(), authority.clone());
        Self {
            router: build_app(state),
            authority,
            config,
        }
    }

    /// `Cookie` header carrying an access token expiring in `seconds` and `r0`.
    pub fn session_cookie(&self, seconds: i64) -> String {
        format!(
            "access_token={}; refresh_token=r0",
            self.authority.access_token_expiring_in(seconds)
        )
    }

    /// Browser navigation to `path`.
    pub async fn navigate(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut req = Request::builder()
            .method("GET")
            .uri(path)
            .header(ACCEPT, HTML)
            .header("Sec-Fetch-Dest", "document");
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }
        self.send(req.body(Body::empty()).expect("Failed to build request"))
            .await
    }

    /// JSON API call.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(cookie) = cookie {
            req = req.header(COOKIE, cookie);
        }

        self.send(req.body(Body::from(body_str)).expect("Failed to build request"))
            .await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            text: String::from_utf8_lossy(&body_bytes).into_owned(),
            body: serde_json::from_slice(&body_bytes).unwrap_or(Value::Null),
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body
    pub text: String,
    /// Parsed JSON body, `Null` when not JSON
    pub body: Value,
}

impl TestResponse {
    /// Every `Set-Cookie` value.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().expect("ASCII cookie").to_string())
            .collect()
    }

    /// The `Set-Cookie` value for `name`, if any.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies().into_iter().find(|c| c.starts_with(&prefix))
    }

    /// Value assigned to cookie `name` by this response.
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.set_cookie(name).map(|c| {
            c[name.len() + 1..]
                .split(';')
                .next()
                .unwrap_or_default()
                .to_string()
        })
    }

    /// A `Cookie` request header replaying every cookie this response set.
    pub fn replay_cookies(&self) -> String {
        self.set_cookies()
            .iter()
            .filter_map(|c| c.split(';').next())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// The `Location` header.
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}
