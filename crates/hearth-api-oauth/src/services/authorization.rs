//! Authorization-code issuance and redemption.

use crate::error::OAuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hearth_db::models::{AuthorizationCode, NewAuthorizationCode, RedemptionRejection};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// Authorization code length in bytes (32 bytes = 256 bits).
const AUTH_CODE_LENGTH: usize = 32;

/// Service for the authorization-code lifecycle.
#[derive(Debug, Clone)]
pub struct AuthorizationService {
    pool: PgPool,
}

impl AuthorizationService {
    /// Create a new authorization service.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Generate a cryptographically secure authorization code.
    ///
    /// Uses `OsRng` directly from the operating system's CSPRNG.
    fn generate_code() -> String {
        use rand::rngs::OsRng;
        use rand::RngCore;
        let mut bytes = [0u8; AUTH_CODE_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Hash an authorization code for storage.
    fn hash_code(code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Issue a new authorization code bound to {client, member, household,
    /// redirect URI, scope}, expiring 10 minutes from now.
    ///
    /// Returns the plaintext code for the consent redirect; only its digest
    /// is stored.
    pub async fn issue(
        &self,
        client_id: Uuid,
        user_id: Uuid,
        tenant_id: Uuid,
        redirect_uri: &str,
        scope: &str,
    ) -> Result<String, OAuthError> {
        let code = Self::generate_code();
        let code_hash = Self::hash_code(&code);

        let new = NewAuthorizationCode::new(
            code_hash,
            client_id,
            user_id,
            tenant_id,
            redirect_uri.to_string(),
            scope.to_string(),
        );

        AuthorizationCode::create(&self.pool, &new)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create authorization code: {}", e);
                OAuthError::Internal("Failed to create authorization code".to_string())
            })?;

        Ok(code)
    }

    /// Redeem an authorization code, at most once.
    ///
    /// The store performs the redemption as a single atomic conditional
    /// update; a resubmitted or concurrently raced code loses. Every
    /// rejection reason collapses to `invalid_grant` on the wire — the
    /// distinct cause is only logged.
    pub async fn redeem(
        &self,
        code: &str,
        client_id: Uuid,
        redirect_uri: &str,
    ) -> Result<AuthorizationCode, OAuthError> {
        let code_hash = Self::hash_code(code);

        let outcome = AuthorizationCode::redeem(&self.pool, &code_hash, client_id, redirect_uri)
            .await
            .map_err(|e| {
                tracing::error!("Failed to redeem authorization code: {}", e);
                OAuthError::Internal("Database error".to_string())
            })?;

        match outcome {
            Ok(redeemed) => Ok(redeemed),
            Err(rejection) => {
                if rejection == RedemptionRejection::AlreadyRedeemed {
                    // Replay of a consumed code: worth a louder signal.
                    tracing::warn!(
                        client_id = %client_id,
                        "Authorization code reuse detected"
                    );
                } else {
                    tracing::warn!(
                        client_id = %client_id,
                        reason = %rejection,
                        "Authorization code redemption rejected"
                    );
                }
                Err(OAuthError::InvalidGrant(
                    "Authorization code is invalid, expired, or already used".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_generation_length() {
        let code = AuthorizationService::generate_code();
        // 32 bytes base64url encoded without padding = 43 characters
        assert_eq!(code.len(), 43);
    }

    #[test]
    fn test_code_generation_is_unique() {
        let code1 = AuthorizationService::generate_code();
        let code2 = AuthorizationService::generate_code();
        assert_ne!(code1, code2);
    }

    #[test]
    fn test_code_is_url_safe() {
        let code = AuthorizationService::generate_code();
        assert!(code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_code_hash_is_deterministic() {
        let code = "test-authorization-code";
        assert_eq!(
            AuthorizationService::hash_code(code),
            AuthorizationService::hash_code(code)
        );
    }

    #[test]
    fn test_code_hash_is_sha256_hex() {
        let hash = AuthorizationService::hash_code("test-authorization-code");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_different_codes_hash_differently() {
        assert_ne!(
            AuthorizationService::hash_code("code-one"),
            AuthorizationService::hash_code("code-two")
        );
    }
}
