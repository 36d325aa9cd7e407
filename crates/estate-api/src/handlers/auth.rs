//! Same-origin auth relay: login, refresh, logout.
//!
//! Each endpoint forwards to the token authority and mirrors the outcome
//! into the HTTP-only credential cookies, so the gatekeeper and the client
//! runtime start from the same issuance.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use tracing::{info, warn};
use validator::Validate;

use estate_core::error::AppError;
use estate_core::traits::CredentialStore;
use estate_core::types::LoginCredentials;
use estate_store::CookieCredentialStore;
use estate_store::keys::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};

use crate::dto::request::{LoginRequest, RefreshBody};
use crate::dto::response::{ApiResponse, LogoutResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let credentials = LoginCredentials::from(req);
    let tokens = state.authority.login(&credentials).await?;

    let store = CookieCredentialStore::new(jar, (*state.cookie_policy).clone());
    store
        .write(&tokens.access_token, &tokens.refresh_token, tokens.expires_in)
        .await;
    info!(username = %credentials.username, expires_in = tokens.expires_in, "User logged in");

    Ok((store.into_jar(), Json(tokens)).into_response())
}

/// POST /api/auth/refresh
///
/// Accepts `{refresh_token}` or an empty body, in which case the
/// `refresh_token` cookie is used. Answers the authority's token body on
/// success. A rejected token clears both cookies.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body: RefreshBody = if body.is_empty() {
        RefreshBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid refresh body: {e}")))?
    };

    let store = CookieCredentialStore::new(jar, (*state.cookie_policy).clone());
    let refresh_token = match body.refresh_token.filter(|t| !t.is_empty()) {
        Some(token) => Some(token),
        None => store.refresh_token().await,
    };
    let Some(refresh_token) = refresh_token else {
        return Err(AppError::authentication("No refresh token").into());
    };

    match state.authority.refresh(&refresh_token).await {
        Ok(tokens) => {
            store
                .write(&tokens.access_token, &tokens.refresh_token, tokens.expires_in)
                .await;
            info!(expires_in = tokens.expires_in, "Session refreshed via relay");
            Ok((store.into_jar(), Json(tokens)).into_response())
        }
        Err(e) if e.is_authentication() => {
            warn!(error = %e, "Refresh token rejected, clearing session cookies");
            store.clear().await;
            Ok((store.into_jar(), ApiError(e)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let store = CookieCredentialStore::new(jar, (*state.cookie_policy).clone());
    store.clear().await;
    info!("User logged out");

    (
        store.into_jar(),
        Json(ApiResponse::ok(LogoutResponse {
            cleared: [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE],
        })),
    )
        .into_response()
}
