//! Authorization endpoint handlers (front channel).
//!
//! Phase A (`GET`) validates the request and renders the consent page.
//! Phase B (`POST`) re-validates from scratch and records the member's
//! decision, redirecting back to the client either way.
//!
//! Error delivery follows the open-redirect guard: failures that occur
//! before the redirect URI is confirmed against the allow-list come back
//! as JSON, never as a redirect. Only after the URI is validated are
//! protocol errors (`access_denied`) delivered by redirect.

use crate::error::OAuthError;
use crate::middleware::SessionContext;
use crate::models::{effective_scope, AuthorizeRequest, ConsentAction, ConsentForm};
use crate::router::OAuthState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use hearth_db::models::OAuthClient;

/// The single supported response type.
pub const RESPONSE_TYPE_CODE: &str = "code";

/// Render the consent prompt for a signed-in member.
#[utoipa::path(
    get,
    path = "/oauth/authorize",
    params(AuthorizeRequest),
    responses(
        (status = 200, description = "Consent page (HTML)"),
        (status = 400, description = "Invalid authorization request"),
        (status = 401, description = "No authenticated session"),
    ),
    tag = "Delegated authorization"
)]
pub async fn authorize_handler(
    State(state): State<OAuthState>,
    _session: SessionContext,
    Query(request): Query<AuthorizeRequest>,
) -> Result<Html<String>, OAuthError> {
    if request.response_type != RESPONSE_TYPE_CODE {
        return Err(OAuthError::UnsupportedResponseType(request.response_type));
    }

    let client = state
        .client_service
        .find_active_client(&request.client_id)
        .await?;

    state
        .client_service
        .validate_redirect_uri(&client, &request.redirect_uri)?;

    // No code is issued in this phase; the page only presents the decision.
    Ok(Html(render_consent_page(
        &client,
        &request.redirect_uri,
        &request.state,
        request.scope.as_deref(),
    )))
}

/// Record the member's consent decision.
#[utoipa::path(
    post,
    path = "/oauth/authorize",
    request_body(content = ConsentForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Redirect to the client with code or access_denied"),
        (status = 400, description = "Invalid authorization request"),
        (status = 401, description = "No authenticated session"),
    ),
    tag = "Delegated authorization"
)]
pub async fn consent_handler(
    State(state): State<OAuthState>,
    session: SessionContext,
    Form(form): Form<ConsentForm>,
) -> Result<Response, OAuthError> {
    // Phase A's validation is never trusted to have been honored by this
    // request: resolve and check everything again.
    let client = state
        .client_service
        .find_active_client(&form.client_id)
        .await?;

    state
        .client_service
        .validate_redirect_uri(&client, &form.redirect_uri)?;

    match form.action {
        ConsentAction::Deny => {
            // A successful "no": the member goes back to the client's own
            // error handling. No code row is created.
            let location = build_redirect_url(
                &form.redirect_uri,
                &[("error", "access_denied"), ("state", &form.state)],
            )?;
            found_redirect(&location)
        }
        ConsentAction::Allow => {
            let scope = effective_scope(form.scope.as_deref());
            let code = state
                .authorization_service
                .issue(
                    client.id,
                    session.user_id,
                    session.tenant_id,
                    &form.redirect_uri,
                    scope,
                )
                .await?;

            let location = build_redirect_url(
                &form.redirect_uri,
                &[("code", &code), ("state", &form.state)],
            )?;
            found_redirect(&location)
        }
    }
}

/// Append query parameters to an allow-listed redirect URI.
fn build_redirect_url(base: &str, params: &[(&str, &str)]) -> Result<String, OAuthError> {
    // The URI already passed the allow-list check; a registered URI that
    // does not parse is a registration data problem.
    let mut url = url::Url::parse(base).map_err(|e| {
        tracing::error!(redirect_uri = %base, "Registered redirect URI is not a valid URL: {}", e);
        OAuthError::Internal("Invalid registered redirect URI".to_string())
    })?;

    url.query_pairs_mut().extend_pairs(params);
    Ok(url.to_string())
}

/// Build a 302 Found redirect response.
fn found_redirect(location: &str) -> Result<Response, OAuthError> {
    let value = HeaderValue::from_str(location).map_err(|_| {
        OAuthError::Internal("Redirect location contains invalid header characters".to_string())
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, value)]).into_response())
}

// ============================================================================
// HTML template (minimal, server-rendered)
// ============================================================================

/// Render the consent page.
///
/// Every caller-supplied string interpolated here is attacker-controlled
/// query-string data and is escaped against markup injection.
fn render_consent_page(
    client: &OAuthClient,
    redirect_uri: &str,
    state: &str,
    scope: Option<&str>,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Authorize {client_name} - Hearth</title>
    <style>
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f5f5f5; min-height: 100vh; display: flex; align-items: center; justify-content: center; }}
        .container {{ background: white; padding: 2rem; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); max-width: 420px; width: 100%; }}
        h1 {{ font-size: 1.5rem; margin-bottom: 1rem; color: #333; text-align: center; }}
        p {{ color: #666; margin-bottom: 1rem; }}
        ul {{ color: #444; margin: 0 0 1.5rem 1.25rem; }}
        li {{ margin-bottom: 0.25rem; }}
        .buttons {{ display: flex; gap: 0.75rem; }}
        button {{ flex: 1; padding: 0.75rem; border: none; border-radius: 4px; font-size: 1rem; cursor: pointer; }}
        .allow {{ background: #0066cc; color: white; }}
        .allow:hover {{ background: #0052a3; }}
        .deny {{ background: #eee; color: #333; }}
        .deny:hover {{ background: #ddd; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Authorize {client_name}</h1>
        <p><strong>{client_name}</strong> is asking to act on your behalf in your household. It will be able to:</p>
        <ul>
            <li>View and manage tasks and approvals</li>
            <li>Record and review spending</li>
            <li>Manage vendors and bookings</li>
            <li>View and update the household calendar</li>
        </ul>
        <form method="post" action="/oauth/authorize">
            <input type="hidden" name="client_id" value="{client_id}" />
            <input type="hidden" name="redirect_uri" value="{redirect_uri}" />
            <input type="hidden" name="state" value="{state}" />
            <input type="hidden" name="scope" value="{scope}" />
            <div class="buttons">
                <button class="deny" type="submit" name="action" value="deny">Deny</button>
                <button class="allow" type="submit" name="action" value="allow">Allow</button>
            </div>
        </form>
    </div>
</body>
</html>"#,
        client_name = html_escape(&client.name),
        client_id = html_escape(&client.client_id),
        redirect_uri = html_escape(redirect_uri),
        state = html_escape(state),
        scope = html_escape(scope.unwrap_or("")),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
