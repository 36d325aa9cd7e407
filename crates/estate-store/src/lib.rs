//! # estate-store
//!
//! The two physical backings of [`CredentialStore`]:
//!
//! - **cookie**: HTTP-only `access_token` / `refresh_token` cookies, scoped to
//!   one request in the pre-render gatekeeper
//! - **local**: script-readable key-value slots for the client runtime,
//!   in memory or persisted to a JSON file
//!
//! The backings are deliberately independent. Neither observes the other's
//! writes; they only agree right after a refresh or login response has been
//! written to both.
//!
//! [`CredentialStore`]: estate_core::traits::CredentialStore

pub mod cookie;
pub mod keys;
pub mod local;

pub use cookie::{CookieCredentialStore, CookiePolicy};
pub use local::LocalCredentialStore;
