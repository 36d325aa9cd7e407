//! Axum middleware stack.

pub mod cors;
pub mod gatekeeper;
pub mod logging;
