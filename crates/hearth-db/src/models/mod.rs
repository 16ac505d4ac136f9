//! Entity models for the delegated-authorization store.

pub mod access_token;
pub mod authorization_code;
pub mod oauth_client;

pub use access_token::{AccessToken, NewAccessToken, ACCESS_TOKEN_EXPIRY_DAYS};
pub use authorization_code::{
    AuthorizationCode, NewAuthorizationCode, RedemptionRejection, AUTH_CODE_EXPIRY_MINUTES,
};
pub use oauth_client::{NewOAuthClient, OAuthClient};
