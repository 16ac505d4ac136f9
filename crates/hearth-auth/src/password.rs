//! Secret hashing with Argon2id.
//!
//! Provides secure hashing and verification of client secrets using
//! Argon2id with OWASP-recommended parameters. Verification goes through
//! the [`SecretVerifier`] trait so any constant-time adaptive-hash
//! implementation can be substituted without touching protocol logic.

use crate::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Verifies a candidate secret against a stored hash.
///
/// The comparison must be constant-time by construction of the underlying
/// hash primitive. Implementations must return `false` (not an error) for
/// a well-formed hash that simply does not match.
pub trait SecretVerifier: Send + Sync {
    /// Returns `true` iff `candidate` matches the stored `hash`.
    fn verify(&self, hash: &str, candidate: &str) -> bool;
}

/// Secret hasher configuration.
///
/// Uses OWASP 2024 recommended parameters for Argon2id:
/// - Memory: 19456 KiB (19 MiB)
/// - Iterations: 2
/// - Parallelism: 1
#[derive(Debug, Clone)]
pub struct SecretHasher {
    params: Params,
}

impl Default for SecretHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretHasher {
    /// Create a new hasher with OWASP-recommended parameters.
    #[must_use]
    pub fn new() -> Self {
        // m=19456 (19 MiB), t=2, p=1. These are hardcoded constants that are
        // always valid; failure would indicate a bug in the argon2 crate.
        let params = Params::new(19456, 2, 1, None)
            .expect("OWASP 2024 Argon2 parameters are valid constants");

        Self { params }
    }

    /// Create a hasher with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashingFailed(format!("Invalid parameters: {e}")))?;

        Ok(Self { params })
    }

    /// Hash a secret using Argon2id.
    ///
    /// Returns a PHC-formatted hash string.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::HashingFailed` if hashing fails.
    pub fn hash(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AuthError::HashingFailed(format!("Hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verify a secret against a PHC-formatted hash.
    ///
    /// Returns `Ok(true)` if the secret matches, `Ok(false)` if not.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidHashFormat` if the hash cannot be parsed.
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidHashFormat)?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        match argon2.verify_password(secret.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Ok(false), // Other errors also treated as non-match
        }
    }
}

/// The default [`SecretVerifier`]: Argon2id via [`SecretHasher`].
///
/// A malformed stored hash verifies as `false`; the condition is a data
/// problem the caller cannot act on mid-request.
#[derive(Debug, Clone, Default)]
pub struct Argon2Verifier {
    hasher: SecretHasher,
}

impl Argon2Verifier {
    /// Create a verifier with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretVerifier for Argon2Verifier {
    fn verify(&self, hash: &str, candidate: &str) -> bool {
        self.hasher.verify(candidate, hash).unwrap_or(false)
    }
}

/// Hash a secret using Argon2id with OWASP-recommended parameters.
///
/// Convenience function using the default [`SecretHasher`].
///
/// # Example
///
/// ```rust
/// use hearth_auth::hash_secret;
///
/// let hash = hash_secret("my-client-secret").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_secret(secret: &str) -> Result<String, AuthError> {
    SecretHasher::new().hash(secret)
}

/// Verify a secret against an Argon2id hash.
///
/// Convenience function using the default [`SecretHasher`].
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, AuthError> {
    SecretHasher::new().verify(secret, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smaller parameters so the test suite stays fast.
    fn test_hasher() -> SecretHasher {
        SecretHasher::with_params(4096, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_secret_returns_argon2id() {
        let hash = test_hasher().hash("test-secret").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_secret_correct() {
        let hasher = test_hasher();
        let hash = hasher.hash("correct-secret").unwrap();
        assert!(hasher.verify("correct-secret", &hash).unwrap());
    }

    #[test]
    fn test_verify_secret_incorrect() {
        let hasher = test_hasher();
        let hash = hasher.hash("correct-secret").unwrap();
        assert!(!hasher.verify("wrong-secret", &hash).unwrap());
    }

    #[test]
    fn test_verify_secret_invalid_hash_format() {
        let result = test_hasher().verify("secret", "not-a-valid-hash");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), AuthError::InvalidHashFormat));
    }

    #[test]
    fn test_hash_is_unique() {
        let hasher = test_hasher();
        let secret = "same-secret";
        let hash1 = hasher.hash(secret).unwrap();
        let hash2 = hasher.hash(secret).unwrap();

        // Same secret produces different hashes (different salts)
        assert_ne!(hash1, hash2);
        assert!(hasher.verify(secret, &hash1).unwrap());
        assert!(hasher.verify(secret, &hash2).unwrap());
    }

    #[test]
    fn test_default_parameters_in_phc_string() {
        let hash = hash_secret("test").unwrap();
        // PHC format includes algorithm and parameters
        // Example: $argon2id$v=19$m=19456,t=2,p=1$...
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=19456"));
        assert!(hash.contains("t=2"));
        assert!(hash.contains("p=1"));
    }

    #[test]
    fn test_argon2_verifier_matches() {
        let hash = test_hasher().hash("secret-value").unwrap();
        let verifier = Argon2Verifier::new();
        assert!(verifier.verify(&hash, "secret-value"));
        assert!(!verifier.verify(&hash, "other-value"));
    }

    #[test]
    fn test_argon2_verifier_malformed_hash_is_false() {
        let verifier = Argon2Verifier::new();
        assert!(!verifier.verify("garbage", "secret-value"));
    }

    #[test]
    fn test_unicode_secret() {
        let hasher = test_hasher();
        let secret = "пароль日本語🔐";
        let hash = hasher.hash(secret).unwrap();
        assert!(hasher.verify(secret, &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }
}
