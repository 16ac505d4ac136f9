//! Delegated-authorization error types.
//!
//! The wire taxonomy is a closed enum so unhandled cases are caught at
//! compile time. Code-redemption failures and client-authentication
//! failures are deliberately conflated on the wire (`invalid_grant` and
//! `invalid_client` respectively); the specific cause is only logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire-level error codes for the authorization and token endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OAuthErrorCode {
    /// The request is missing a required parameter or is malformed.
    InvalidRequest,
    /// Unknown client, inactive client, or secret mismatch.
    InvalidClient,
    /// The authorization code is invalid (any redemption failure).
    InvalidGrant,
    /// The redirect URI is not on the client's allow-list.
    InvalidRedirectUri,
    /// The caller asked for an unimplemented response type.
    UnsupportedResponseType,
    /// The caller asked for an unimplemented grant type.
    UnsupportedGrantType,
    /// The member declined consent (a normal outcome, not a server fault).
    AccessDenied,
    /// Unexpected persistence or internal failure.
    ServerError,
}

impl std::fmt::Display for OAuthErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidRedirectUri => "invalid_redirect_uri",
            Self::UnsupportedResponseType => "unsupported_response_type",
            Self::UnsupportedGrantType => "unsupported_grant_type",
            Self::AccessDenied => "access_denied",
            Self::ServerError => "server_error",
        };
        write!(f, "{s}")
    }
}

/// JSON error body returned for non-redirect failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthErrorResponse {
    /// Error code.
    pub error: OAuthErrorCode,
    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl OAuthErrorResponse {
    /// Create a new error response.
    pub fn new(error: OAuthErrorCode, description: impl Into<String>) -> Self {
        Self {
            error,
            error_description: Some(description.into()),
        }
    }
}

/// Delegated-authorization API errors.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Missing or malformed request parameter.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client resolution or authentication failed.
    #[error("Invalid client: {0}")]
    InvalidClient(String),

    /// Authorization code redemption failed.
    #[error("Invalid grant: {0}")]
    InvalidGrant(String),

    /// Redirect URI not on the client's allow-list.
    #[error("Invalid redirect URI: {0}")]
    InvalidRedirectUri(String),

    /// Unsupported response type.
    #[error("Unsupported response type: {0}")]
    UnsupportedResponseType(String),

    /// Unsupported grant type.
    #[error("Unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    /// Member declined consent.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// No authenticated session was supplied by the upstream resolver.
    #[error("Authentication required")]
    SessionRequired,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OAuthError {
    /// Get the HTTP status code for this error.
    ///
    /// All protocol failures are 400 per the platform's wire contract;
    /// only a missing session (401) and internal faults (500) differ.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::InvalidClient(_)
            | Self::InvalidGrant(_)
            | Self::InvalidRedirectUri(_)
            | Self::UnsupportedResponseType(_)
            | Self::UnsupportedGrantType(_) => StatusCode::BAD_REQUEST,
            Self::AccessDenied(_) => StatusCode::FORBIDDEN,
            Self::SessionRequired => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the wire error code for this error.
    #[must_use]
    pub fn error_code(&self) -> OAuthErrorCode {
        match self {
            Self::InvalidRequest(_) | Self::SessionRequired => OAuthErrorCode::InvalidRequest,
            Self::InvalidClient(_) => OAuthErrorCode::InvalidClient,
            Self::InvalidGrant(_) => OAuthErrorCode::InvalidGrant,
            Self::InvalidRedirectUri(_) => OAuthErrorCode::InvalidRedirectUri,
            Self::UnsupportedResponseType(_) => OAuthErrorCode::UnsupportedResponseType,
            Self::UnsupportedGrantType(_) => OAuthErrorCode::UnsupportedGrantType,
            Self::AccessDenied(_) => OAuthErrorCode::AccessDenied,
            Self::Database(_) | Self::Internal(_) => OAuthErrorCode::ServerError,
        }
    }

    /// Convert to the JSON wire body.
    ///
    /// Internal faults are surfaced opaquely; their detail lives in the
    /// server-side log only.
    #[must_use]
    pub fn to_response(&self) -> OAuthErrorResponse {
        match self {
            Self::Database(_) | Self::Internal(_) => OAuthErrorResponse {
                error: OAuthErrorCode::ServerError,
                error_description: None,
            },
            other => OAuthErrorResponse::new(other.error_code(), other.to_string()),
        }
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        match &self {
            OAuthError::Database(e) => {
                tracing::error!(error = %e, "Database failure in delegated-authorization flow");
            }
            OAuthError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal failure in delegated-authorization flow");
            }
            _ => {}
        }

        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
