//! Cookie names and storage keys for every credential slot.
//!
//! Centralising the names keeps the gatekeeper, the relay endpoints and the
//! client runtime agreeing on them.

/// Prefix applied to script-readable storage keys.
const PREFIX: &str = "estate";

// ── Cookies ────────────────────────────────────────────────

/// HTTP-only cookie holding the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// HTTP-only cookie holding the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

// ── Script-readable storage ────────────────────────────────

/// Storage key for the access token.
pub fn access_token_key() -> String {
    format!("{PREFIX}.access_token")
}

/// Storage key for the refresh token.
pub fn refresh_token_key() -> String {
    format!("{PREFIX}.refresh_token")
}
