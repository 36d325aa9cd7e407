//! # estate-core
//!
//! Core crate for the Estate portal's session token lifecycle. Contains the
//! credential store trait, token wire types, configuration schemas, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Estate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
