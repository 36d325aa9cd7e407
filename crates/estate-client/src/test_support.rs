//! Shared test infrastructure: an in-process backend and builders.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::{HeaderMap, Method, StatusCode};
use tokio::sync::mpsc;

use estate_core::config::ClientConfig;
use estate_core::traits::CredentialStore;
use estate_core::types::{RefreshRequest, TokenResponse};
use estate_store::LocalCredentialStore;

use crate::coordinator::RefreshCoordinator;
use crate::error::HttpError;
use crate::interceptor::RequestInterceptor;
use crate::navigator::{ChannelNavigator, Navigation};
use crate::transport::{InboundResponse, OutboundRequest, Transport};

/// How the backend answers refresh calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Rotate both tokens.
    Rotate,
    /// Answer 401.
    Reject,
    /// Answer 200 with an unusable body.
    Malformed,
    /// Drop the connection.
    Unreachable,
}

/// In-process backend speaking the refresh protocol.
///
/// Business paths answer 200 only for the currently valid access token and
/// 401 otherwise. Paths in `always_unauthorized` answer 401 unconditionally.
#[derive(Debug)]
pub struct MockBackend {
    valid_access: Mutex<String>,
    valid_refresh: Mutex<String>,
    mode: Mutex<RefreshMode>,
    refresh_delay: Duration,
    always_unauthorized: Mutex<Vec<String>>,
    rotate_into: Mutex<Option<Arc<LocalCredentialStore>>>,
    refresh_calls: AtomicUsize,
    business_calls: AtomicUsize,
    issued: AtomicUsize,
    last_authorization: Mutex<Option<String>>,
    last_refresh_token: Mutex<Option<String>>,
}

impl MockBackend {
    pub fn new(valid_access: &str, valid_refresh: &str) -> Arc<Self> {
        Arc::new(Self {
            valid_access: Mutex::new(valid_access.to_string()),
            valid_refresh: Mutex::new(valid_refresh.to_string()),
            mode: Mutex::new(RefreshMode::Rotate),
            refresh_delay: Duration::from_millis(50),
            always_unauthorized: Mutex::new(Vec::new()),
            rotate_into: Mutex::new(None),
            refresh_calls: AtomicUsize::new(0),
            business_calls: AtomicUsize::new(0),
            issued: AtomicUsize::new(0),
            last_authorization: Mutex::new(None),
            last_refresh_token: Mutex::new(None),
        })
    }

    pub fn set_mode(&self, mode: RefreshMode) {
        *self.mode.lock().unwrap() = mode;
    }

    pub fn deny(&self, path: &str) {
        self.always_unauthorized.lock().unwrap().push(path.to_string());
    }

    /// Makes the next stale-token business call first rotate `store`, as if
    /// a concurrent refresh completed while the call was in flight.
    pub fn rotate_on_next_rejection(&self, store: Arc<LocalCredentialStore>) {
        *self.rotate_into.lock().unwrap() = Some(store);
    }

    /// Invalidates the current access token without touching the store.
    pub fn expire_access(&self) {
        *self.valid_access.lock().unwrap() = "expired-upstream".to_string();
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn business_calls(&self) -> usize {
        self.business_calls.load(Ordering::SeqCst)
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.last_authorization.lock().unwrap().clone()
    }

    pub fn last_refresh_token(&self) -> Option<String> {
        self.last_refresh_token.lock().unwrap().clone()
    }

    fn issue(&self) -> TokenResponse {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let tokens = TokenResponse {
            access_token: format!("access-{n}"),
            refresh_token: format!("refresh-{n}"),
            expires_in: 900,
        };
        *self.valid_access.lock().unwrap() = tokens.access_token.clone();
        *self.valid_refresh.lock().unwrap() = tokens.refresh_token.clone();
        tokens
    }

    async fn handle_refresh(&self, request: &OutboundRequest) -> Result<InboundResponse, HttpError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.refresh_delay).await;

        let body: RefreshRequest = request
            .body
            .as_ref()
            .map(|b| serde_json::from_slice(b).unwrap())
            .unwrap();
        *self.last_refresh_token.lock().unwrap() = Some(body.refresh_token.clone());

        let mode = *self.mode.lock().unwrap();
        match mode {
            RefreshMode::Rotate => {
                if body.refresh_token != *self.valid_refresh.lock().unwrap() {
                    return Ok(respond(StatusCode::UNAUTHORIZED, "invalid refresh token"));
                }
                Ok(respond_json(StatusCode::OK, &self.issue()))
            }
            RefreshMode::Reject => Ok(respond(StatusCode::UNAUTHORIZED, "refresh revoked")),
            RefreshMode::Malformed => Ok(respond(StatusCode::OK, "{\"access_token\":1}")),
            RefreshMode::Unreachable => Err(HttpError::Transport("connection reset".into())),
        }
    }

    async fn handle_business(&self, request: &OutboundRequest) -> InboundResponse {
        self.business_calls.fetch_add(1, Ordering::SeqCst);
        let authorization = request
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_authorization.lock().unwrap() = authorization.clone();

        let route = request.path.split(['?', '#']).next().unwrap_or(&request.path);
        if self
            .always_unauthorized
            .lock()
            .unwrap()
            .iter()
            .any(|denied| denied == route)
        {
            return respond(StatusCode::UNAUTHORIZED, "denied");
        }

        let expected = format!("Bearer {}", self.valid_access.lock().unwrap());
        if authorization.as_deref() == Some(expected.as_str()) {
            return respond(StatusCode::OK, &format!("ok:{}", request.path));
        }

        let rotate = self.rotate_into.lock().unwrap().take();
        if let Some(store) = rotate {
            let tokens = self.issue();
            store
                .write(&tokens.access_token, &tokens.refresh_token, tokens.expires_in)
                .await;
        }
        respond(StatusCode::UNAUTHORIZED, "token expired")
    }
}

#[async_trait]
impl Transport for MockBackend {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, HttpError> {
        match (&request.method, request.path.as_str()) {
            (&Method::POST, "/api/auth/refresh") => self.handle_refresh(&request).await,
            (&Method::POST, "/api/auth/login") => Ok(respond_json(StatusCode::OK, &self.issue())),
            _ => Ok(self.handle_business(&request).await),
        }
    }
}

fn respond(status: StatusCode, body: &str) -> InboundResponse {
    InboundResponse {
        status,
        headers: HeaderMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

fn respond_json<T: serde::Serialize>(status: StatusCode, body: &T) -> InboundResponse {
    InboundResponse {
        status,
        headers: HeaderMap::new(),
        body: Bytes::from(serde_json::to_vec(body).unwrap()),
    }
}

/// A runtime wired to a [`MockBackend`].
pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub store: Arc<LocalCredentialStore>,
    pub navigator: Arc<ChannelNavigator>,
    pub navigations: mpsc::UnboundedReceiver<Navigation>,
    pub interceptor: RequestInterceptor,
}

impl Harness {
    /// Backend and store both hold `access-0` / `refresh-0`.
    pub async fn signed_in() -> Self {
        let harness = Self::signed_out();
        harness.store.write("access-0", "refresh-0", 900).await;
        harness
    }

    /// Backend knows `access-0` / `refresh-0`; the store is empty.
    pub fn signed_out() -> Self {
        let backend = MockBackend::new("access-0", "refresh-0");
        let store = Arc::new(LocalCredentialStore::in_memory());
        let (navigator, navigations) = ChannelNavigator::new("/properties?page=2");
        let navigator = Arc::new(navigator);
        let interceptor = RequestInterceptor::new(
            &ClientConfig::default(),
            backend.clone(),
            store.clone(),
            navigator.clone(),
        );
        Self {
            backend,
            store,
            navigator,
            navigations,
            interceptor,
        }
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        self.interceptor.coordinator()
    }

    /// Every navigation emitted so far.
    pub fn drain_navigations(&mut self) -> Vec<Navigation> {
        let mut out = Vec::new();
        while let Ok(nav) = self.navigations.try_recv() {
            out.push(nav);
        }
        out
    }
}
