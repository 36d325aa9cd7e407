//! JWT expiry decoding and claims.

pub mod claims;
pub mod decoder;
#[cfg(any(test, feature = "test-util"))]
pub mod encoder;

pub use claims::TokenClaims;
pub use decoder::ExpiryDecoder;
#[cfg(any(test, feature = "test-util"))]
pub use encoder::JwtEncoder;
