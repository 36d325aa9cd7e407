//! Pre-render gatekeeper.
//!
//! Runs before every page handler:
//!
//! 1. exempt paths pass through untouched
//! 2. no refresh cookie: redirect to the login page, carrying the original
//!    path and query as return target
//! 3. access token missing, undecodable or inside the refresh margin, on a
//!    document request: refresh synchronously with the authority, write both
//!    cookies on the response and rewrite the request's `Cookie` header so
//!    the handler already sees the new pair
//!
//! A failed refresh is logged and the request proceeds; the gatekeeper never
//! produces an error page.

use axum::extract::{Request, State};
use axum::http::header::COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{debug, info, warn};

use estate_auth::gatekeeper::is_document_request;
use estate_core::traits::CredentialStore;
use estate_store::CookieCredentialStore;

use crate::state::AppState;

/// Gatekeeper middleware, mounted with `from_fn_with_state`.
pub async fn gatekeeper(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let policy = &state.gate_policy;

    if policy.is_exempt(&path) {
        return next.run(request).await;
    }

    let store = CookieCredentialStore::from_headers(request.headers(), (*state.cookie_policy).clone());
    let credentials = store.read().await.unwrap_or_default();

    let Some(refresh_token) = credentials.refresh_token else {
        let return_to = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        debug!(path = %path, "No refresh cookie, redirecting to login");
        return Redirect::temporary(&policy.login_redirect(return_to)).into_response();
    };

    let decision = policy.refresh_decision(credentials.access_token.as_deref());
    if decision.should_refresh() && is_document_request(request.headers()) {
        match state.authority.refresh(&refresh_token).await {
            Ok(tokens) => {
                store
                    .write(&tokens.access_token, &tokens.refresh_token, tokens.expires_in)
                    .await;
                if let Some(cookie) = store.request_header() {
                    request.headers_mut().insert(COOKIE, cookie);
                }
                info!(
                    path = %path,
                    decision = ?decision,
                    expires_in = tokens.expires_in,
                    "Proactively refreshed session"
                );
            }
            Err(e) => {
                warn!(
                    path = %path,
                    decision = ?decision,
                    transient = e.is_transient(),
                    error = %e,
                    "Proactive refresh failed"
                );
            }
        }
    } else if decision.should_refresh() {
        debug!(path = %path, "Refresh deferred to the document request");
    }

    let response = next.run(request).await;
    (store.into_jar(), response).into_response()
}
