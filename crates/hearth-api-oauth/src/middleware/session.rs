//! Authenticated-session extractor.
//!
//! The platform's session resolver runs ahead of this subsystem: it
//! validates the member's session cookie, resolves the current household,
//! and inserts a [`SessionContext`] request extension. This module only
//! consumes that contract; a request that reaches the authorize endpoints
//! without one is rejected with 401.

use crate::error::OAuthError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// The authenticated member and household for the current request.
///
/// Inserted as a request extension by the upstream session-resolution
/// middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    /// The signed-in household member.
    pub user_id: Uuid,
    /// The member's current household.
    pub tenant_id: Uuid,
}

impl SessionContext {
    /// Create a session context.
    #[must_use]
    pub fn new(user_id: Uuid, tenant_id: Uuid) -> Self {
        Self { user_id, tenant_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = OAuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .copied()
            .ok_or(OAuthError::SessionRequired)
    }
}
