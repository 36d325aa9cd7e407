//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use estate_core::types::LoginCredentials;

/// Login request body.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl From<LoginRequest> for LoginCredentials {
    fn from(req: LoginRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
        }
    }
}

/// Refresh relay body. The token falls back to the `refresh_token` cookie
/// when the body is empty or omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshBody {
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}
