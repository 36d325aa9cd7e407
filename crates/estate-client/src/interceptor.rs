//! Bearer injection with refresh-and-retry-once on 401.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use estate_auth::redirect::login_redirect;
use estate_core::config::ClientConfig;
use estate_core::result::AppResult;
use estate_core::traits::CredentialStore;
use estate_core::types::{LoginCredentials, TokenResponse};
use estate_store::LocalCredentialStore;

use crate::coordinator::RefreshCoordinator;
use crate::error::HttpError;
use crate::navigator::Navigator;
use crate::transport::{InboundResponse, OutboundRequest, ReqwestTransport, Transport};

/// Method, headers and body of a business call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method, `GET` by default.
    pub method: Method,
    /// Extra headers. An `Authorization` header here is overwritten when a
    /// credential is stored.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
}

impl RequestOptions {
    /// A `GET` without body.
    pub fn get() -> Self {
        Self::default()
    }

    /// A request with a JSON body.
    pub fn json<T: Serialize + ?Sized>(method: Method, body: &T) -> Result<Self, HttpError> {
        let request = OutboundRequest::new(method, String::new()).json(body)?;
        Ok(Self {
            method: request.method,
            headers: request.headers,
            body: request.body,
        })
    }

    /// Adds a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Wraps every outbound business call of the client runtime.
///
/// Cheap to clone; clones share the store, the coordinator and the
/// termination latch.
#[derive(Debug, Clone)]
pub struct RequestInterceptor {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    coordinator: RefreshCoordinator,
    refresh_path: String,
    login_path: String,
    login_page: String,
    return_param: String,
    no_refresh_paths: Vec<String>,
    /// Set once the session is terminated; cleared by `login`.
    terminated: AtomicBool,
}

impl RequestInterceptor {
    /// Wires an interceptor from its collaborators.
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let coordinator = RefreshCoordinator::new(
            Arc::clone(&transport),
            Arc::clone(&store),
            config.refresh_path.clone(),
        );

        Self {
            inner: Arc::new(Inner {
                transport,
                store,
                navigator,
                coordinator,
                refresh_path: config.refresh_path.clone(),
                login_path: config.login_path.clone(),
                login_page: config.login_page.clone(),
                return_param: config.return_param.clone(),
                no_refresh_paths: config.no_refresh_paths.clone(),
                terminated: AtomicBool::new(false),
            }),
        }
    }

    /// Builds the production runtime: `reqwest` transport and the
    /// script-readable store (file-backed when `credential_file` is set).
    pub async fn connect(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> AppResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config)?);
        let store: Arc<dyn CredentialStore> = match &config.credential_file {
            Some(path) => Arc::new(LocalCredentialStore::open(path).await),
            None => Arc::new(LocalCredentialStore::in_memory()),
        };
        info!(base_url = %config.base_url, "Client runtime ready");
        Ok(Self::new(config, transport, store, navigator))
    }

    /// The coordinator shared by every call.
    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.inner.coordinator
    }

    /// The credential store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// Whether the session was terminated and no login happened since.
    pub fn is_terminated(&self) -> bool {
        self.inner.terminated.load(Ordering::Acquire)
    }

    /// Issues a call and returns the body of a 2xx response.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Bytes, HttpError> {
        self.send(path, options).await?.into_result()
    }

    /// Issues a call and decodes the JSON body of a 2xx response.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, HttpError> {
        let body = self.request(path, options).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Issues a call and returns the final response, whatever its status.
    ///
    /// A 401 triggers at most one refresh and one retry; the retry's outcome
    /// is final. When the refresh fails the store is cleared, the runtime is
    /// sent to the login page once, and the original 401 is returned.
    pub async fn send(&self, path: &str, options: RequestOptions) -> Result<InboundResponse, HttpError> {
        let inner = &self.inner;
        let sent = inner.store.access_token().await;
        let response = inner.dispatch(path, &options, sent.as_deref()).await?;

        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        if inner.is_exempt(path) {
            debug!(path, "401 from exempt path, not refreshing");
            return Ok(response);
        }
        if self.is_terminated() {
            debug!(path, "401 after session termination");
            return Ok(response);
        }

        let current = inner.store.access_token().await;
        let recovered = if current.is_some() && current != sent {
            debug!(path, "Credential rotated while call was in flight");
            true
        } else {
            inner.coordinator.refresh().await
        };

        if recovered {
            let fresh = inner.store.access_token().await;
            return inner.dispatch(path, &options, fresh.as_deref()).await;
        }

        inner.terminate().await;
        Ok(response)
    }

    /// Exchanges username/password for a pair and stores it.
    ///
    /// Re-arms automatic refresh after a terminated session.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<TokenResponse, HttpError> {
        let inner = &self.inner;
        let request = OutboundRequest::new(Method::POST, inner.login_path.as_str()).json(credentials)?;
        let body = inner.transport.send(request).await?.into_result()?;
        let tokens: TokenResponse = serde_json::from_slice(&body)?;

        inner
            .store
            .write(&tokens.access_token, &tokens.refresh_token, tokens.expires_in)
            .await;
        inner.terminated.store(false, Ordering::Release);
        info!(expires_in = tokens.expires_in, "Logged in");
        Ok(tokens)
    }

    /// Clears the store and leaves for the login page.
    pub async fn logout(&self) {
        let inner = &self.inner;
        inner.terminated.store(true, Ordering::Release);
        inner.store.clear().await;
        info!("Logged out");
        inner.navigator.navigate(&inner.login_page);
    }
}

impl Inner {
    async fn dispatch(
        &self,
        path: &str,
        options: &RequestOptions,
        access_token: Option<&str>,
    ) -> Result<InboundResponse, HttpError> {
        let mut request = OutboundRequest {
            method: options.method.clone(),
            path: path.to_string(),
            headers: options.headers.clone(),
            body: options.body.clone(),
        };
        if let Some(token) = access_token {
            request = request.bearer(token)?;
        }
        self.transport.send(request).await
    }

    fn is_exempt(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        path == self.refresh_path || self.no_refresh_paths.iter().any(|p| p == path)
    }

    /// Ends the session exactly once per login.
    async fn terminate(&self) {
        if self
            .terminated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        self.store.clear().await;
        let target = login_redirect(
            &self.login_page,
            &self.return_param,
            &self.navigator.current_location(),
        );
        warn!(target = %target, "Session terminated, redirecting to login");
        self.navigator.navigate(&target);
    }
}
