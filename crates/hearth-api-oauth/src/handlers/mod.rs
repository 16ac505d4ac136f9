//! Delegated-authorization endpoint handlers.

pub mod authorize;
pub mod token;

pub use authorize::{authorize_handler, consent_handler};
pub use token::token_handler;
