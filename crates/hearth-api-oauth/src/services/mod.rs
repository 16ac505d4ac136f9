//! Services for the delegated-authorization flows.

pub mod authorization;
pub mod client;
pub mod token;

pub use authorization::AuthorizationService;
pub use client::ClientService;
pub use token::TokenService;
