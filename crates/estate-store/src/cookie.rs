//! HTTP-only cookie backing, scoped to one request.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use http::HeaderValue;
use tracing::debug;

use estate_core::config::{AppConfig, SameSitePolicy};
use estate_core::traits::CredentialStore;
use estate_core::types::Credentials;

use crate::keys::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};

/// Attributes applied to both credential cookies.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    /// `Secure` attribute.
    pub secure: bool,
    /// Cookie path.
    pub path: String,
    /// `SameSite` attribute.
    pub same_site: SameSitePolicy,
    /// Max-age of the refresh-token cookie, in seconds.
    pub refresh_max_age_seconds: u64,
}

impl CookiePolicy {
    /// Derives the policy from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            secure: config.secure_cookies(),
            path: config.session.cookie_path.clone(),
            same_site: config.session.same_site,
            refresh_max_age_seconds: config.session.refresh_cookie_max_age_seconds,
        }
    }

    fn same_site(&self) -> SameSite {
        match self.same_site {
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
        }
    }

    fn build(&self, name: &'static str, value: String, max_age_seconds: u64) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.secure)
            .path(self.path.clone())
            .same_site(self.same_site())
            .max_age(time::Duration::seconds(
                i64::try_from(max_age_seconds).unwrap_or(i64::MAX),
            ))
            .build()
    }

    fn removal(&self, name: &'static str) -> Cookie<'static> {
        Cookie::build(name).path(self.path.clone()).build()
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Credential store over the request's cookie jar.
///
/// Reads see the incoming cookies until a write or clear replaces them.
/// Writes are collected as a delta that [`into_jar`](Self::into_jar) hands to
/// the outgoing response, so cookies are set exactly once, on the response
/// being built for this request.
pub struct CookieCredentialStore {
    jar: Mutex<CookieJar>,
    policy: CookiePolicy,
}

impl std::fmt::Debug for CookieCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieCredentialStore")
            .field("policy", &self.policy)
            .finish()
    }
}

impl CookieCredentialStore {
    /// Wraps the incoming jar.
    pub fn new(jar: CookieJar, policy: CookiePolicy) -> Self {
        Self {
            jar: Mutex::new(jar),
            policy,
        }
    }

    /// Builds the store from request headers.
    pub fn from_headers(headers: &http::HeaderMap, policy: CookiePolicy) -> Self {
        Self::new(CookieJar::from_headers(headers), policy)
    }

    /// The jar carrying every `Set-Cookie` produced by writes and clears.
    pub fn into_jar(self) -> CookieJar {
        self.jar.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Renders the current cookies as a `Cookie` request header.
    ///
    /// Used to let the downstream renderer see rotated tokens within the same
    /// request. `None` when the jar is empty.
    pub fn request_header(&self) -> Option<HeaderValue> {
        let jar = self.lock();
        let rendered = jar
            .iter()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .collect::<Vec<_>>()
            .join("; ");
        if rendered.is_empty() {
            return None;
        }
        HeaderValue::from_str(&rendered).ok()
    }

    fn lock(&self) -> MutexGuard<'_, CookieJar> {
        self.jar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn value(&self, name: &str) -> Option<String> {
        self.lock()
            .get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[async_trait]
impl CredentialStore for CookieCredentialStore {
    async fn write(&self, access_token: &str, refresh_token: &str, access_ttl_seconds: u64) {
        let access = self
            .policy
            .build(ACCESS_TOKEN_COOKIE, access_token.to_string(), access_ttl_seconds);
        let refresh = self.policy.build(
            REFRESH_TOKEN_COOKIE,
            refresh_token.to_string(),
            self.policy.refresh_max_age_seconds,
        );

        let mut jar = self.lock();
        let current = std::mem::replace(&mut *jar, CookieJar::new());
        *jar = current.add(access).add(refresh);
        debug!(access_ttl_seconds, "credential cookies staged");
    }

    async fn read(&self) -> Option<Credentials> {
        let credentials = Credentials {
            access_token: self.value(ACCESS_TOKEN_COOKIE),
            refresh_token: self.value(REFRESH_TOKEN_COOKIE),
        };
        (!credentials.is_empty()).then_some(credentials)
    }

    async fn clear(&self) {
        let mut jar = self.lock();
        let current = std::mem::replace(&mut *jar, CookieJar::new());
        *jar = current
            .remove(self.policy.removal(ACCESS_TOKEN_COOKIE))
            .remove(self.policy.removal(REFRESH_TOKEN_COOKIE));
        debug!("credential cookies cleared");
    }
}
