//! Client for the external token authority.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use estate_core::config::AuthConfig;
use estate_core::error::AppError;
use estate_core::result::AppResult;
use estate_core::types::{LoginCredentials, RefreshRequest, TokenResponse};

/// The backend that issues and rotates token pairs.
#[async_trait]
pub trait TokenAuthority: Send + Sync + std::fmt::Debug + 'static {
    /// Exchanges a refresh token for a new pair.
    ///
    /// Errors with `ErrorKind::Authentication` when the authority rejects the
    /// token, `ErrorKind::ExternalService` when it is unreachable or answers
    /// with a malformed body.
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse>;

    /// Exchanges username/password for an initial pair.
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<TokenResponse>;
}

/// [`TokenAuthority`] over HTTP using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTokenAuthority {
    http: reqwest::Client,
    refresh_url: String,
    login_url: String,
}

impl HttpTokenAuthority {
    /// Creates an authority client from configuration.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            refresh_url: config.refresh_url(),
            login_url: config.login_url(),
        })
    }

    async fn post_for_tokens<B: serde::Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
    ) -> AppResult<TokenResponse> {
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Token authority unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            debug!(%status, url, "token authority rejected request");
            return Err(status_error(status, &text));
        }

        resp.json::<TokenResponse>().await.map_err(|e| {
            AppError::external_service(format!("Malformed token authority response: {e}"))
        })
    }
}

#[async_trait]
impl TokenAuthority for HttpTokenAuthority {
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.post_for_tokens(&self.refresh_url, &body).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> AppResult<TokenResponse> {
        self.post_for_tokens(&self.login_url, credentials).await
    }
}

fn status_error(status: StatusCode, text: &str) -> AppError {
    let message = format!("Token authority answered {status}: {text}");
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            AppError::authentication(message)
        }
        StatusCode::UNPROCESSABLE_ENTITY => AppError::validation(message),
        _ => AppError::external_service(message),
    }
}
