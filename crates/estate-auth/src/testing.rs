//! In-process token authority for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use estate_core::error::{AppError, ErrorKind};
use estate_core::result::AppResult;
use estate_core::types::{LoginCredentials, TokenResponse};

use crate::authority::TokenAuthority;
use crate::jwt::JwtEncoder;

/// Username accepted by [`FakeAuthority::login`].
pub const FAKE_USERNAME: &str = "agent";
/// Password accepted by [`FakeAuthority::login`].
pub const FAKE_PASSWORD: &str = "hunter2";

#[derive(Serialize)]
struct FixtureClaims {
    exp: i64,
    iat: i64,
    sub: &'static str,
    jti: usize,
}

/// Authority that rotates one refresh token and mints real JWTs.
///
/// Every issuance yields a distinct access token and `refresh-<n>`; only the
/// latest refresh token is accepted.
pub struct FakeAuthority {
    encoder: JwtEncoder,
    expires_in: u64,
    valid_refresh: Mutex<String>,
    current_access: Mutex<Option<String>>,
    failure: Mutex<Option<ErrorKind>>,
    issued: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl std::fmt::Debug for FakeAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeAuthority")
            .field("expires_in", &self.expires_in)
            .field("refresh_calls", &self.refresh_calls())
            .finish()
    }
}

impl FakeAuthority {
    /// Accepts `refresh_token` until the first rotation; issues 15-minute
    /// access tokens.
    pub fn new(refresh_token: &str) -> Self {
        Self {
            encoder: JwtEncoder::default(),
            expires_in: 900,
            valid_refresh: Mutex::new(refresh_token.to_string()),
            current_access: Mutex::new(None),
            failure: Mutex::new(None),
            issued: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    /// Makes every subsequent call fail with `kind`.
    pub fn fail_with(&self, kind: ErrorKind) {
        *self.failure.lock().unwrap() = Some(kind);
    }

    /// Number of refresh calls received.
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// The refresh token currently accepted.
    pub fn valid_refresh_token(&self) -> String {
        self.valid_refresh.lock().unwrap().clone()
    }

    /// Whether `token` is the most recently issued access token.
    pub fn is_current_access(&self, token: &str) -> bool {
        self.current_access.lock().unwrap().as_deref() == Some(token)
    }

    /// Invalidates every issued access token, as if they all expired.
    pub fn revoke_access_tokens(&self) {
        *self.current_access.lock().unwrap() = None;
    }

    /// A signed access token expiring `seconds` from now.
    pub fn access_token_expiring_in(&self, seconds: i64) -> String {
        self.encoder.access_token_expiring_in(seconds)
    }

    fn check_failure(&self) -> AppResult<()> {
        match *self.failure.lock().unwrap() {
            Some(kind) => Err(AppError::new(kind, "Injected authority failure")),
            None => Ok(()),
        }
    }

    fn issue(&self) -> TokenResponse {
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now().timestamp();
        let access_token = self.encoder.encode_claims(&FixtureClaims {
            exp: now + self.expires_in as i64,
            iat: now,
            sub: FAKE_USERNAME,
            jti: n,
        });
        let refresh_token = format!("refresh-{n}");
        *self.valid_refresh.lock().unwrap() = refresh_token.clone();
        *self.current_access.lock().unwrap() = Some(access_token.clone());

        TokenResponse {
            access_token,
            refresh_token,
            expires_in: self.expires_in,
        }
    }
}

#[async_trait]
impl TokenAuthority for FakeAuthority {
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        if refresh_token != self.valid_refresh_token() {
            return Err(AppError::authentication("Refresh token revoked"));
        }
        Ok(self.issue())
    }

    async fn login(&self, credentials: &LoginCredentials) -> AppResult<TokenResponse> {
        self.check_failure()?;
        if credentials.username != FAKE_USERNAME || credentials.password != FAKE_PASSWORD {
            return Err(AppError::authentication("Invalid username or password"));
        }
        Ok(self.issue())
    }
}
