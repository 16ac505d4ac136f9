//! Secret hashing and verification for Hearth.
//!
//! This crate provides Argon2id hashing with OWASP-recommended parameters
//! for client secrets and other stored credentials, plus the
//! [`SecretVerifier`] capability trait that lets protocol code verify a
//! candidate against a stored hash without knowing which adaptive hash is
//! behind it.
//!
//! # Example
//!
//! ```rust
//! use hearth_auth::{hash_secret, verify_secret};
//!
//! let hash = hash_secret("my-client-secret").unwrap();
//! assert!(verify_secret("my-client-secret", &hash).unwrap());
//! assert!(!verify_secret("wrong-secret", &hash).unwrap());
//! ```

mod error;
mod password;

pub use error::AuthError;
pub use password::{hash_secret, verify_secret, Argon2Verifier, SecretHasher, SecretVerifier};
