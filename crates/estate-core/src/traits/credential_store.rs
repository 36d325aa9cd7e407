//! Credential store trait for the two physical token backings.

use async_trait::async_trait;

use crate::types::Credentials;

/// Named slots holding the current access and refresh token.
///
/// Two adapters implement this: the HTTP-only cookie jar seen by the
/// pre-render gatekeeper, and the script-readable key-value store seen by the
/// client runtime. The adapters are **not** kept consistent with each other;
/// each execution context owns its copy and only reconciles when a refresh
/// or login response hands it a new pair.
///
/// Implementations never make network calls and have no failure mode beyond
/// "absent".
#[async_trait]
pub trait CredentialStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist both tokens. Readers never observe one without the other.
    async fn write(&self, access_token: &str, refresh_token: &str, access_ttl_seconds: u64);

    /// Current pair, or `None` if never set or cleared.
    async fn read(&self) -> Option<Credentials>;

    /// Remove both tokens.
    async fn clear(&self);

    /// Current access token, if any.
    async fn access_token(&self) -> Option<String> {
        self.read().await.and_then(|c| c.access_token)
    }

    /// Current refresh token, if any.
    async fn refresh_token(&self) -> Option<String> {
        self.read().await.and_then(|c| c.refresh_token)
    }
}
