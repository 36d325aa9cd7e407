//! Error model shared by the portal, the store adapters and the client
//! runtime.
//!
//! Every fallible path in the workspace ends in an [`AppError`]; the HTTP
//! layer decides the status code from its [`ErrorKind`] alone.

use std::fmt;
use thiserror::Error;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The presented credential was missing or refused.
    Authentication,
    /// Malformed caller input.
    Validation,
    /// The token authority was unreachable or answered unexpectedly.
    ExternalService,
    /// Settings could not be loaded.
    Configuration,
    /// A payload did not (de)serialize.
    Serialization,
    /// Filesystem or socket failure.
    Io,
    Internal,
}

impl ErrorKind {
    /// Stable upper-case label used in log lines and `Display`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "AUTHENTICATION",
            Self::Validation => "VALIDATION",
            Self::ExternalService => "EXTERNAL_SERVICE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Io => "IO",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether the same call may succeed later without the caller changing
    /// anything. A refused credential never recovers on its own.
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::ExternalService | Self::Io)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error carried through every `AppResult`.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    /// Human-readable, safe to show to the caller. Never contains a token.
    pub message: String,
    #[source]
    pub source: Option<BoxedSource>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause.
    pub fn caused_by(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// The token authority failed in a way unrelated to the credential.
    pub fn external_service(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the credential itself was refused, as opposed to the
    /// authority being unavailable.
    pub fn is_authentication(&self) -> bool {
        self.kind == ErrorKind::Authentication
    }

    /// See [`ErrorKind::is_transient`].
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::Serialization, format!("Invalid JSON: {err}")).caused_by(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, format!("I/O failure: {err}")).caused_by(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(format!("Invalid configuration: {err}")).caused_by(err)
    }
}
