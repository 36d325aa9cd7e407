//! Exemptions, expiry margin, and document-request detection.

use chrono::Utc;
use http::HeaderMap;
use http::header::ACCEPT;

use estate_core::config::{GatekeeperConfig, SessionConfig};

use crate::jwt::ExpiryDecoder;
use crate::redirect::login_redirect;

/// Fetch-metadata header naming the request's destination.
const SEC_FETCH_DEST: &str = "sec-fetch-dest";

/// Outcome of inspecting the incoming access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    /// Token outlives the margin.
    Fresh {
        /// Seconds until `exp`.
        remaining_seconds: i64,
    },
    /// Token expires within the margin (or already has).
    NearExpiry {
        /// Seconds until `exp`; negative once expired.
        remaining_seconds: i64,
    },
    /// No access token cookie.
    Missing,
    /// Access token present but its expiry could not be read.
    Undecodable,
}

impl RefreshDecision {
    /// Whether a proactive refresh should run.
    pub fn should_refresh(&self) -> bool {
        !matches!(self, RefreshDecision::Fresh { .. })
    }
}

/// Gatekeeper rules derived from configuration.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    login_path: String,
    refresh_path: String,
    public_paths: Vec<String>,
    static_prefixes: Vec<String>,
    return_param: String,
    refresh_margin_seconds: i64,
    decoder: ExpiryDecoder,
}

impl GatePolicy {
    /// Creates a policy from gatekeeper and session configuration.
    pub fn new(gatekeeper: &GatekeeperConfig, session: &SessionConfig) -> Self {
        Self {
            login_path: gatekeeper.login_path.clone(),
            refresh_path: gatekeeper.refresh_path.clone(),
            public_paths: gatekeeper.public_paths.clone(),
            static_prefixes: gatekeeper.static_prefixes.clone(),
            return_param: gatekeeper.return_param.clone(),
            refresh_margin_seconds: i64::try_from(session.refresh_margin_seconds)
                .unwrap_or(i64::MAX),
            decoder: ExpiryDecoder::new(),
        }
    }

    /// Login page path.
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Whether `path` bypasses the gatekeeper entirely.
    ///
    /// The login page and the refresh endpoint are always exempt; without
    /// that, a failing refresh would redirect into itself.
    pub fn is_exempt(&self, path: &str) -> bool {
        path == self.login_path
            || path == self.refresh_path
            || self.public_paths.iter().any(|p| p == path)
            || self.static_prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    /// Inspects `access_token` against the current time.
    pub fn refresh_decision(&self, access_token: Option<&str>) -> RefreshDecision {
        self.refresh_decision_at(access_token, Utc::now().timestamp())
    }

    /// Inspects `access_token` against `now` (seconds since epoch).
    pub fn refresh_decision_at(&self, access_token: Option<&str>, now: i64) -> RefreshDecision {
        let Some(token) = access_token.filter(|t| !t.is_empty()) else {
            return RefreshDecision::Missing;
        };

        match self.decoder.remaining_seconds_at(token, now) {
            Ok(remaining_seconds) if remaining_seconds < self.refresh_margin_seconds => {
                RefreshDecision::NearExpiry { remaining_seconds }
            }
            Ok(remaining_seconds) => RefreshDecision::Fresh { remaining_seconds },
            Err(_) => RefreshDecision::Undecodable,
        }
    }

    /// Login redirect carrying `return_to` (path plus query).
    pub fn login_redirect(&self, return_to: &str) -> String {
        login_redirect(&self.login_path, &self.return_param, return_to)
    }
}

/// Whether the request will produce a full page document.
///
/// Sub-resource and partial-render fetches of the same navigation run in
/// parallel with it; only the document request may refresh, so a single
/// navigation triggers at most one refresh call.
pub fn is_document_request(headers: &HeaderMap) -> bool {
    if let Some(dest) = headers.get(SEC_FETCH_DEST).and_then(|v| v.to_str().ok()) {
        if !dest.eq_ignore_ascii_case("document") {
            return false;
        }
    }

    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| {
            accept
                .split(',')
                .any(|part| part.trim().starts_with("text/html"))
        })
        .unwrap_or(false)
}
