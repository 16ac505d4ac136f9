//! Long-lived access token entity model.
//!
//! A bearer credential granting API access on behalf of a household member.
//! Minted once by the token endpoint; afterwards only `last_used_at` and
//! `revoked_at` are ever mutated. Rows are never deleted, only marked
//! revoked. Ownership is by user + household; the issuing client is not
//! retained on the row.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use hearth_core::{TenantId, UserId};

/// Access token expiration in days.
pub const ACCESS_TOKEN_EXPIRY_DAYS: i64 = 365;

/// A long-lived bearer token, stored as a SHA-256 digest of the value
/// handed to the client.
#[derive(Debug, Clone, FromRow)]
pub struct AccessToken {
    /// Internal unique identifier.
    pub id: Uuid,

    /// SHA-256 digest (hex) of the token value.
    pub token_hash: String,

    /// The household member the token acts on behalf of.
    pub user_id: Uuid,

    /// The household the token is scoped to.
    pub tenant_id: Uuid,

    /// Optional display name (e.g. the requesting integration's name).
    pub name: Option<String>,

    /// When the token was minted.
    pub created_at: DateTime<Utc>,

    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,

    /// Best-effort advisory timestamp of the last use.
    pub last_used_at: Option<DateTime<Utc>>,

    /// Set by administrative revocation; null means not revoked.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Get the household as a typed `TenantId`.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        TenantId::from_uuid(self.tenant_id)
    }

    /// Get the owning member as a typed `UserId`.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.user_id)
    }

    /// Check if the token's expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the token has been administratively revoked.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check if the token is currently usable.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_expired() && !self.is_revoked()
    }

    /// Insert a new token row.
    pub async fn create(pool: &PgPool, new: &NewAccessToken) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r"
            INSERT INTO access_tokens (token_hash, user_id, tenant_id, name, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, token_hash, user_id, tenant_id, name,
                      created_at, expires_at, last_used_at, revoked_at
            ",
        )
        .bind(&new.token_hash)
        .bind(new.user_id)
        .bind(new.tenant_id)
        .bind(&new.name)
        .bind(new.expires_at)
        .fetch_one(pool)
        .await
    }

    /// Find a currently valid (unexpired, unrevoked) token by digest.
    ///
    /// Resource endpoints call this to validate a presented bearer value.
    pub async fn find_valid_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, token_hash, user_id, tenant_id, name,
                   created_at, expires_at, last_used_at, revoked_at
            FROM access_tokens
            WHERE token_hash = $1
              AND expires_at > NOW()
              AND revoked_at IS NULL
            ",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Record a use of the token.
    ///
    /// Best-effort and advisory only: failures are logged and swallowed so
    /// this can never fail the request that triggered it.
    pub async fn touch_last_used(pool: &PgPool, token_hash: &str) {
        let result = sqlx::query(
            r"
            UPDATE access_tokens
            SET last_used_at = NOW()
            WHERE token_hash = $1
            ",
        )
        .bind(token_hash)
        .execute(pool)
        .await;

        if let Err(e) = result {
            tracing::warn!("Failed to update access token last_used_at: {}", e);
        }
    }

    /// Mark a token revoked. Returns `true` if a row transitioned.
    ///
    /// The revocation surface lives elsewhere; the mutation is part of the
    /// schema's contract.
    pub async fn revoke(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r"
            UPDATE access_tokens
            SET revoked_at = NOW()
            WHERE token_hash = $1 AND revoked_at IS NULL
            ",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete long-expired token rows (for the external housekeeping job).
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            DELETE FROM access_tokens
            WHERE expires_at < NOW()
            ",
        )
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Data for creating a new access token row.
#[derive(Debug, Clone)]
pub struct NewAccessToken {
    pub token_hash: String,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub name: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl NewAccessToken {
    /// Create a new token row with the standard 365-day expiry window.
    #[must_use]
    pub fn new(token_hash: String, user_id: Uuid, tenant_id: Uuid, name: Option<String>) -> Self {
        Self {
            token_hash,
            user_id,
            tenant_id,
            name,
            expires_at: Utc::now() + Duration::days(ACCESS_TOKEN_EXPIRY_DAYS),
        }
    }
}
