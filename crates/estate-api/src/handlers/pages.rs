//! Minimal page shell.
//!
//! Real screens are mounted by the embedding application; these documents
//! only let the server run standalone and give the gatekeeper something to
//! guard.

use axum::response::Html;
use axum_extra::extract::CookieJar;

use estate_auth::ExpiryDecoder;
use estate_store::keys::ACCESS_TOKEN_COOKIE;

use crate::router::LOGIN_RELAY;

/// GET /
///
/// Renders after the gatekeeper, so the access cookie seen here is the one
/// the gatekeeper left on the request.
pub async fn home(jar: CookieJar) -> Html<String> {
    let remaining = jar
        .get(ACCESS_TOKEN_COOKIE)
        .and_then(|c| ExpiryDecoder::new().decode(c.value()).ok())
        .map(|claims| claims.remaining_seconds().to_string())
        .unwrap_or_else(|| "none".to_string());

    Html(format!(
        "<!doctype html>\n<html><head><title>Estate Portal</title></head>\
         <body data-session-remaining=\"{remaining}\"><h1>Estate Portal</h1></body></html>\n"
    ))
}

/// GET /login
pub async fn login_page() -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html><head><title>Sign in</title></head><body>\
         <form method=\"post\" action=\"{LOGIN_RELAY}\">\
         <input name=\"username\" autocomplete=\"username\">\
         <input name=\"password\" type=\"password\" autocomplete=\"current-password\">\
         <button type=\"submit\">Sign in</button>\
         </form></body></html>\n"
    ))
}
