//! Error types for secret hashing operations.

use thiserror::Error;

/// Secret hashing and verification errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Hashing operation failed.
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash is not in a recognized PHC format.
    #[error("Invalid secret hash format")]
    InvalidHashFormat,
}
