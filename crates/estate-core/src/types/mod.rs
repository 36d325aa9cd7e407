//! Shared value types for credentials and the token authority wire format.

pub mod credentials;
pub mod token;

pub use credentials::Credentials;
pub use token::{LoginCredentials, RefreshRequest, TokenResponse};
