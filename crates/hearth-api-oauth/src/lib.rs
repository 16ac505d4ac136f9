//! Delegated-authorization server API for Hearth.
//!
//! This crate implements the platform's OAuth2-style authorization server:
//! third-party integrations ("clients") obtain a scoped access token to act
//! on behalf of a household member without ever seeing that member's
//! primary credentials.
//!
//! # Supported Grant Type
//!
//! - **Authorization Code**: the single supported grant. Tokens are opaque,
//!   long-lived bearer values; there is no PKCE and no refresh-token
//!   rotation.
//!
//! # Endpoints (mounted at /oauth)
//!
//! - `GET /oauth/authorize` - Render the consent page for a signed-in member
//! - `POST /oauth/authorize` - Record the member's allow/deny decision
//! - `POST /oauth/token` - Exchange an authorization code for an access token
//!
//! The authenticated member and household are supplied by the upstream
//! session resolver as a [`SessionContext`] request extension; this crate
//! never authenticates the end user itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_api_oauth::{oauth_router, OAuthState};
//! use axum::Router;
//!
//! let state = OAuthState::new(pool);
//! let app = Router::new().nest("/oauth", oauth_router(state));
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use error::{OAuthError, OAuthErrorCode};
pub use middleware::SessionContext;
pub use router::{oauth_router, OAuthState};
