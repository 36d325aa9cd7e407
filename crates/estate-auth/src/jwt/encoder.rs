//! Fixture token minting for tests.
//!
//! Token issuance belongs to the external authority; this encoder exists so
//! tests can produce realistic signed JWTs with a chosen `exp`.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;

use super::claims::TokenClaims;

/// Creates HS256-signed JWTs.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
}

impl Default for JwtEncoder {
    fn default() -> Self {
        Self::new("estate-test-secret")
    }
}

impl JwtEncoder {
    /// Creates an encoder signing with `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Signs arbitrary claims.
    pub fn encode_claims<T: Serialize>(&self, claims: &T) -> String {
        encode(&Header::default(), claims, &self.encoding_key).expect("fixture token encodes")
    }

    /// Token whose `exp` is the given epoch second.
    pub fn encode_with_expiry(&self, exp: i64) -> String {
        self.encode_claims(&TokenClaims {
            exp,
            sub: Some("fixture-user".to_string()),
            iat: Some(Utc::now().timestamp()),
        })
    }

    /// Token expiring `seconds` from now (negative for already expired).
    pub fn access_token_expiring_in(&self, seconds: i64) -> String {
        self.encode_with_expiry(Utc::now().timestamp() + seconds)
    }
}
