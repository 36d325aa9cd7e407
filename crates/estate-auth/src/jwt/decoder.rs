//! Unverified access-token expiry decoding.

use jsonwebtoken::dangerous::insecure_decode;

use estate_core::error::AppError;
use estate_core::result::AppResult;

use super::claims::TokenClaims;

/// Reads the `exp` claim of an access token without checking its signature.
///
/// The result answers "when should we refresh?" and nothing else. A token
/// that decodes fine may still be rejected by the backend, and "looks
/// expired" is never treated as "is invalid". Any signing algorithm is
/// accepted since no key is involved.
#[derive(Debug, Clone, Default)]
pub struct ExpiryDecoder;

impl ExpiryDecoder {
    /// Creates a decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decodes the payload of `token`.
    ///
    /// The token must be a well-formed JWT whose payload carries a numeric
    /// `exp`; header and signature are otherwise ignored.
    pub fn decode(&self, token: &str) -> AppResult<TokenClaims> {
        insecure_decode::<TokenClaims>(token)
            .map(|data| data.claims)
            .map_err(|e| AppError::validation(format!("Undecodable access token: {e}")))
    }

    /// Seconds left before the token's `exp`, measured from `now`.
    pub fn remaining_seconds_at(&self, token: &str, now: i64) -> AppResult<i64> {
        Ok(self.decode(token)?.remaining_seconds_at(now))
    }
}
