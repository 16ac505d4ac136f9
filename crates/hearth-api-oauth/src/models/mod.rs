//! Request and response models for the delegated-authorization endpoints.

pub mod authorize;
pub mod token;

pub use authorize::*;
pub use token::*;
