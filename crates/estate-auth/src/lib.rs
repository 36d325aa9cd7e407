//! # estate-auth
//!
//! Token handling shared by the portal server and the client runtime.
//!
//! ## Modules
//!
//! - `jwt`: unverified expiry decoding of access tokens
//! - `gatekeeper`: pre-render refresh policy (exemptions, expiry margin, document detection)
//! - `authority`: HTTP client for the external token authority
//! - `redirect`: login-page redirect targets carrying the return location

pub mod authority;
pub mod gatekeeper;
pub mod jwt;
pub mod redirect;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use authority::{HttpTokenAuthority, TokenAuthority};
pub use gatekeeper::{GatePolicy, RefreshDecision};
pub use jwt::{ExpiryDecoder, TokenClaims};
