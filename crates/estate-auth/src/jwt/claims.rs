//! Claims read from an access token's payload.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The subset of access-token claims the portal looks at.
///
/// Only `exp` is required. These values come from an unverified decode and
/// serve as a refresh-timing hint; the backend verifies the signature on
/// every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Subject, when the authority includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

impl TokenClaims {
    /// Seconds left before `exp`, measured from `now`. Negative once expired.
    pub fn remaining_seconds_at(&self, now: i64) -> i64 {
        self.exp - now
    }

    /// Seconds left before `exp`, measured from the current time.
    pub fn remaining_seconds(&self) -> i64 {
        self.remaining_seconds_at(Utc::now().timestamp())
    }
}
