//! HTTP seam of the client runtime.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use estate_core::config::ClientConfig;
use estate_core::config::auth::join_url;
use estate_core::error::AppError;
use estate_core::result::AppResult;

use crate::error::HttpError;

/// A call as issued by the runtime, before the transport resolves its URL.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// HTTP method.
    pub method: Method,
    /// Path (with optional query) relative to the backend base URL.
    pub path: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    /// A request without headers or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Sets a JSON body and content type.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        let encoded = serde_json::to_vec(body)
            .map_err(|e| HttpError::InvalidRequest(format!("Unencodable body: {e}")))?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(Bytes::from(encoded));
        Ok(self)
    }

    /// Sets `Authorization: Bearer <token>`, replacing any previous value.
    pub fn bearer(mut self, token: &str) -> Result<Self, HttpError> {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| HttpError::InvalidRequest("Access token is not a valid header".into()))?;
        value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, value);
        Ok(self)
    }
}

/// A fully buffered response.
#[derive(Debug, Clone)]
pub struct InboundResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl InboundResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The body of a 2xx response, or [`HttpError::Status`].
    pub fn into_result(self) -> Result<Bytes, HttpError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(HttpError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Decodes the body as JSON regardless of status.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Sends one request and buffers the response.
///
/// Implementations must not retry or interpret statuses; that is the
/// interceptor's job.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug + 'static {
    /// Sends `request`. Only failures to obtain a response are errors.
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, HttpError>;
}

/// [`Transport`] over `reqwest`, resolving paths against a base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport from client configuration.
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<InboundResponse, HttpError> {
        let url = join_url(&self.base_url, &request.path);
        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        debug!(method = %request.method, path = %request.path, %status, "Request completed");

        Ok(InboundResponse {
            status,
            headers,
            body,
        })
    }
}
