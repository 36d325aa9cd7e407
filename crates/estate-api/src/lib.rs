//! # estate-api
//!
//! Portal server built on Axum.
//!
//! Hosts the pre-render gatekeeper that keeps the cookie credential fresh
//! before any page renders, the same-origin relay endpoints the client
//! runtime talks to (`/api/auth/login`, `/refresh`, `/logout`), and a minimal
//! page shell.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
