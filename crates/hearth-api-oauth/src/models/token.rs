//! Token endpoint request and response models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Token type for issued bearer credentials.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Form body for `POST /oauth/token`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Grant type (must be "authorization_code").
    pub grant_type: String,
    /// The authorization code being redeemed.
    pub code: Option<String>,
    /// Must equal the redirect URI recorded when the code was issued.
    pub redirect_uri: Option<String>,
    /// Public client identifier (may instead arrive via HTTP Basic).
    pub client_id: Option<String>,
    /// Client secret (may instead arrive via HTTP Basic).
    pub client_secret: Option<String>,
}

/// Successful token response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// The bearer token value.
    pub access_token: String,
    /// Always "Bearer".
    pub token_type: String,
    /// Token lifetime in seconds from now.
    pub expires_in: i64,
}

impl TokenResponse {
    /// Build a bearer token response.
    #[must_use]
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
        }
    }
}
