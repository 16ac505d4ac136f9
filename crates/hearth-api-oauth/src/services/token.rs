//! Access-token minting and validation.
//!
//! Tokens are opaque random values with a fixed long lifetime, stored as
//! SHA-256 digests. Ownership is by member + household; the issuing client
//! is not retained on the token.

use crate::error::OAuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hearth_db::models::{AccessToken, NewAccessToken, ACCESS_TOKEN_EXPIRY_DAYS};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// Access token length in bytes (32 bytes = 256 bits).
const ACCESS_TOKEN_LENGTH: usize = 32;

/// Service for minting and validating bearer tokens.
#[derive(Debug, Clone)]
pub struct TokenService {
    pool: PgPool,
}

impl TokenService {
    /// Create a new token service.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The fixed token lifetime, in seconds from mint.
    #[must_use]
    pub fn expires_in_secs() -> i64 {
        ACCESS_TOKEN_EXPIRY_DAYS * 86_400
    }

    /// Generate a cryptographically secure token value.
    ///
    /// Uses `OsRng` directly from the operating system's CSPRNG.
    fn generate_token_value() -> String {
        use rand::rngs::OsRng;
        use rand::RngCore;
        let mut bytes = [0u8; ACCESS_TOKEN_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Hash a token value for storage.
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Mint a new bearer token for a member in a household.
    ///
    /// Returns the plaintext value (handed to the client exactly once)
    /// together with the stored record.
    pub async fn mint(
        &self,
        user_id: Uuid,
        tenant_id: Uuid,
        name: Option<String>,
    ) -> Result<(String, AccessToken), OAuthError> {
        let token = Self::generate_token_value();
        let token_hash = Self::hash_token(&token);

        let new = NewAccessToken::new(token_hash, user_id, tenant_id, name);
        let record = AccessToken::create(&self.pool, &new).await.map_err(|e| {
            tracing::error!("Failed to mint access token: {}", e);
            OAuthError::Internal("Failed to mint access token".to_string())
        })?;

        Ok((token, record))
    }

    /// Validate a presented bearer value.
    ///
    /// Returns the record iff the token exists, is unexpired, and has not
    /// been revoked. Resource endpoints call this on every request.
    pub async fn validate(&self, token: &str) -> Result<Option<AccessToken>, OAuthError> {
        let token_hash = Self::hash_token(token);

        AccessToken::find_valid_by_token_hash(&self.pool, &token_hash)
            .await
            .map_err(|e| {
                tracing::error!("Failed to validate access token: {}", e);
                OAuthError::Internal("Database error".to_string())
            })
    }

    /// Record a use of the token. Best-effort; never fails the caller.
    pub async fn touch_last_used(&self, token: &str) {
        let token_hash = Self::hash_token(token);
        AccessToken::touch_last_used(&self.pool, &token_hash).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_generation_length() {
        let token = TokenService::generate_token_value();
        // 32 bytes base64url encoded without padding = 43 characters
        assert_eq!(token.len(), 43);
    }

    #[test]
    fn test_token_generation_is_unique() {
        assert_ne!(
            TokenService::generate_token_value(),
            TokenService::generate_token_value()
        );
    }

    #[test]
    fn test_token_hash_is_sha256_hex() {
        let hash = TokenService::hash_token("some-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_expires_in_is_one_year() {
        assert_eq!(TokenService::expires_in_secs(), 31_536_000);
    }
}
