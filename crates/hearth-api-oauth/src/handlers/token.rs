//! Token endpoint handler (back channel).
//!
//! The caller is the client's server, not a browser: every outcome is a
//! direct JSON response, never a redirect, and every failure is terminal
//! for the request — the client must start a fresh authorization flow.

use crate::error::OAuthError;
use crate::models::{TokenRequest, TokenResponse};
use crate::router::OAuthState;
use crate::services::TokenService;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    Form, Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};

/// The single supported grant type.
pub const AUTHORIZATION_CODE_GRANT_TYPE: &str = "authorization_code";

/// Exchange an authorization code for a long-lived access token.
#[utoipa::path(
    post,
    path = "/oauth/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid token request"),
    ),
    tag = "Delegated authorization"
)]
pub async fn token_handler(
    State(state): State<OAuthState>,
    headers: HeaderMap,
    Form(request): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, OAuthError> {
    // The grant type gates everything else; credentials are not even
    // examined for a protocol mode this server does not implement.
    if request.grant_type != AUTHORIZATION_CODE_GRANT_TYPE {
        return Err(OAuthError::UnsupportedGrantType(request.grant_type));
    }

    let (client_id, client_secret) = extract_client_credentials(&headers, &request)?;

    handle_authorization_code_grant(&state, &request, &client_id, client_secret.as_deref()).await
}

/// Extract client credentials from the Authorization header or request body.
fn extract_client_credentials(
    headers: &HeaderMap,
    request: &TokenRequest,
) -> Result<(String, Option<String>), OAuthError> {
    // Try HTTP Basic authentication first
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| OAuthError::InvalidClient("Invalid authorization header".to_string()))?;

        if let Some(credentials) = auth_str.strip_prefix("Basic ") {
            let decoded = STANDARD.decode(credentials).map_err(|_| {
                OAuthError::InvalidClient("Invalid base64 in authorization header".to_string())
            })?;

            let decoded_str = String::from_utf8(decoded).map_err(|_| {
                OAuthError::InvalidClient("Invalid UTF-8 in credentials".to_string())
            })?;

            let parts: Vec<&str> = decoded_str.splitn(2, ':').collect();
            if parts.len() == 2 {
                return Ok((parts[0].to_string(), Some(parts[1].to_string())));
            }
            return Err(OAuthError::InvalidClient(
                "Invalid credential format".to_string(),
            ));
        }
    }

    // Fall back to request body
    let client_id = request
        .client_id
        .clone()
        .ok_or_else(|| OAuthError::InvalidRequest("client_id is required".to_string()))?;

    Ok((client_id, request.client_secret.clone()))
}

/// Handle the `authorization_code` grant.
///
/// Steps, each a hard failure point: resolve the client, authenticate it,
/// redeem the code (atomically, at most once), mint the token. Client
/// authentication happens before redemption so a failed exchange never
/// consumes the code.
async fn handle_authorization_code_grant(
    state: &OAuthState,
    request: &TokenRequest,
    client_id: &str,
    client_secret: Option<&str>,
) -> Result<Json<TokenResponse>, OAuthError> {
    let code = request
        .code
        .as_ref()
        .ok_or_else(|| OAuthError::InvalidRequest("code is required".to_string()))?;

    let redirect_uri = request
        .redirect_uri
        .as_ref()
        .ok_or_else(|| OAuthError::InvalidRequest("redirect_uri is required".to_string()))?;

    let client = state.client_service.find_active_client(client_id).await?;

    let secret = client_secret.ok_or_else(|| {
        OAuthError::InvalidClient("Client authentication is required".to_string())
    })?;
    state.client_service.verify_secret(&client, secret)?;

    // The token is bound to the member and household recorded on the code,
    // not to anything the redeeming request claims.
    let redeemed = state
        .authorization_service
        .redeem(code, client.id, redirect_uri)
        .await?;

    let (token, _record) = state
        .token_service
        .mint(
            redeemed.user_id,
            redeemed.tenant_id,
            Some(client.name.clone()),
        )
        .await?;

    Ok(Json(TokenResponse::bearer(
        token,
        TokenService::expires_in_secs(),
    )))
}
