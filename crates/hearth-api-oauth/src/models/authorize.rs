//! Authorization endpoint request models.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// The scope granted when a client does not request one.
pub const DEFAULT_SCOPE: &str = "household:read household:write";

/// Query parameters for `GET /oauth/authorize` (phase A, present consent).
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AuthorizeRequest {
    /// Response type (must be "code").
    pub response_type: String,
    /// Public client identifier.
    pub client_id: String,
    /// Redirect URI (must be on the client's allow-list).
    pub redirect_uri: String,
    /// Opaque caller-supplied value, echoed back unmodified.
    pub state: String,
    /// Requested scope (space-separated); defaults when absent.
    pub scope: Option<String>,
}

/// The member's decision on the consent form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConsentAction {
    /// Grant the client delegated access.
    Allow,
    /// Decline; the client is told `access_denied`.
    Deny,
}

/// Form body for `POST /oauth/authorize` (phase B, record decision).
///
/// The identifying fields are re-validated from scratch; phase A's
/// validation is never trusted to have been honored by this request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConsentForm {
    /// Public client identifier.
    pub client_id: String,
    /// Redirect URI (re-validated against the allow-list).
    pub redirect_uri: String,
    /// Opaque caller-supplied value, echoed back unmodified.
    pub state: String,
    /// Requested scope; defaults when absent.
    pub scope: Option<String>,
    /// The member's decision.
    pub action: ConsentAction,
}

/// Resolve the effective scope for a request, applying the default when the
/// caller omitted it (or sent only whitespace).
#[must_use]
pub fn effective_scope(requested: Option<&str>) -> &str {
    match requested {
        Some(s) if !s.trim().is_empty() => s,
        _ => DEFAULT_SCOPE,
    }
}
