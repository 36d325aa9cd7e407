//! The token pair held by a credential store.

use serde::{Deserialize, Serialize};

/// Tokens currently held by one credential store.
///
/// Both slots are optional because the cookie backing expires them
/// independently: the access cookie's max-age is much shorter than the
/// refresh cookie's. A store whose slots are both empty reads as `None`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Credentials {
    /// Short-lived bearer credential.
    pub access_token: Option<String>,
    /// Long-lived credential used only to obtain a new access token.
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// A pair from one issuance.
    pub fn pair(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
        }
    }

    /// Whether neither slot holds a value.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
