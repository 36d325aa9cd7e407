//! Single-flight token refresh.

use std::sync::{Arc, Mutex, PoisonError};

use http::{Method, StatusCode};
use tracing::{debug, info, warn};

use estate_core::traits::CredentialStore;
use estate_core::types::{RefreshRequest, TokenResponse};

use crate::single_flight::SingleFlight;
use crate::transport::{OutboundRequest, Transport};

/// Flight key shared by every refresh.
const REFRESH_KEY: &str = "refresh";

/// Guarantees at most one refresh call in flight.
///
/// Cheap to clone; clones share the same flight.
#[derive(Debug, Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    transport: Arc<dyn Transport>,
    store: Arc<dyn CredentialStore>,
    refresh_path: String,
    flights: SingleFlight<bool>,
    /// Last refresh token the endpoint refused. Never sent again.
    rejected: Mutex<Option<String>>,
}

impl RefreshCoordinator {
    /// Creates a coordinator posting to `refresh_path` through `transport`.
    pub fn new(
        transport: Arc<dyn Transport>,
        store: Arc<dyn CredentialStore>,
        refresh_path: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                store,
                refresh_path: refresh_path.into(),
                flights: SingleFlight::new(),
                rejected: Mutex::new(None),
            }),
        }
    }

    /// Refreshes the stored pair, or joins the refresh already running.
    ///
    /// Resolves `true` once the new pair is in the store. Any failure
    /// resolves `false` and leaves the store as it was. Never retries, and
    /// never re-sends a refresh token the endpoint already refused.
    pub async fn refresh(&self) -> bool {
        let inner = Arc::clone(&self.inner);
        self.inner
            .flights
            .run(REFRESH_KEY, move || async move { inner.perform().await })
            .await
            .unwrap_or(false)
    }

    /// Whether a refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.inner.flights.is_in_flight(REFRESH_KEY)
    }
}

impl Inner {
    async fn perform(&self) -> bool {
        let Some(refresh_token) = self.store.refresh_token().await else {
            debug!("No refresh token stored, skipping refresh");
            return false;
        };
        if self.is_rejected(&refresh_token) {
            debug!("Stored refresh token was already refused, skipping refresh");
            return false;
        }

        let request = match OutboundRequest::new(Method::POST, self.refresh_path.as_str())
            .json(&RefreshRequest {
                refresh_token: refresh_token.clone(),
            })
        {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Could not build refresh request");
                return false;
            }
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Refresh call failed");
                return false;
            }
        };

        if response.status != StatusCode::OK {
            warn!(status = %response.status, "Refresh rejected");
            *self.rejected.lock().unwrap_or_else(PoisonError::into_inner) = Some(refresh_token);
            return false;
        }

        let tokens: TokenResponse = match response.json() {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "Malformed refresh response");
                return false;
            }
        };

        self.store
            .write(&tokens.access_token, &tokens.refresh_token, tokens.expires_in)
            .await;
        info!(expires_in = tokens.expires_in, "Session refreshed");
        true
    }

    fn is_rejected(&self, refresh_token: &str) -> bool {
        self.rejected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            == Some(refresh_token)
    }
}
