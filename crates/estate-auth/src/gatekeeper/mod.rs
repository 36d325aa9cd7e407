//! Pre-render gatekeeper policy.
//!
//! Pure decisions only; the axum middleware applying them lives in
//! `estate-api`.

pub mod policy;

pub use policy::{GatePolicy, RefreshDecision, is_document_request};
