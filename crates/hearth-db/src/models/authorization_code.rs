//! One-time authorization code entity model.
//!
//! An authorization code is a single-use capability grant: issued on
//! consent approval, redeemed at most once by the token endpoint, retained
//! afterwards for audit and replay detection.

use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use hearth_core::{TenantId, UserId};

/// Authorization code expiration in minutes.
pub const AUTH_CODE_EXPIRY_MINUTES: i64 = 10;

/// Why a redemption attempt was rejected.
///
/// Each reason is distinct for logging and tests; the wire response
/// collapses all of them to `invalid_grant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionRejection {
    /// No code row matches the presented value.
    NotFound,
    /// The code was already redeemed (replay, or a concurrent attempt won).
    AlreadyRedeemed,
    /// The code's expiry has passed.
    Expired,
    /// The presented redirect URI differs from the one recorded at issuance.
    RedirectUriMismatch,
    /// The requesting client is not the code's owning client.
    ClientMismatch,
}

impl std::fmt::Display for RedemptionRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotFound => "not_found",
            Self::AlreadyRedeemed => "already_redeemed",
            Self::Expired => "expired",
            Self::RedirectUriMismatch => "redirect_uri_mismatch",
            Self::ClientMismatch => "client_mismatch",
        };
        write!(f, "{s}")
    }
}

/// A single-use authorization code, stored as a SHA-256 digest of the
/// value handed to the client.
#[derive(Debug, Clone, FromRow)]
pub struct AuthorizationCode {
    /// Internal unique identifier.
    pub id: Uuid,

    /// SHA-256 digest (hex) of the code value.
    pub code_hash: String,

    /// Owning client (internal id).
    pub client_id: Uuid,

    /// The household member who approved the grant.
    pub user_id: Uuid,

    /// The household the grant is scoped to.
    pub tenant_id: Uuid,

    /// Redirect URI presented when the code was issued.
    pub redirect_uri: String,

    /// Requested scope string.
    pub scope: String,

    /// When the code was issued.
    pub created_at: DateTime<Utc>,

    /// When the code stops being redeemable.
    pub expires_at: DateTime<Utc>,

    /// Set exactly once, on redemption. Null means still redeemable.
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl AuthorizationCode {
    /// Get the household as a typed `TenantId`.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        TenantId::from_uuid(self.tenant_id)
    }

    /// Get the approving member as a typed `UserId`.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        UserId::from_uuid(self.user_id)
    }

    /// Check if the code's expiry has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the code has already been redeemed.
    #[must_use]
    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at.is_some()
    }

    /// Insert a new authorization code row.
    pub async fn create(pool: &PgPool, new: &NewAuthorizationCode) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r"
            INSERT INTO authorization_codes (
                code_hash, client_id, user_id, tenant_id, redirect_uri, scope, expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, code_hash, client_id, user_id, tenant_id, redirect_uri, scope,
                      created_at, expires_at, redeemed_at
            ",
        )
        .bind(&new.code_hash)
        .bind(new.client_id)
        .bind(new.user_id)
        .bind(new.tenant_id)
        .bind(&new.redirect_uri)
        .bind(&new.scope)
        .bind(new.expires_at)
        .fetch_one(pool)
        .await
    }

    /// Atomically redeem a code.
    ///
    /// The success path is a single conditional UPDATE scoped by the code's
    /// unique value: of N concurrent attempts for the same code, exactly one
    /// observes `redeemed_at IS NULL` and wins. There is no separate
    /// read-then-write step visible to concurrent callers.
    ///
    /// On failure, a follow-up read classifies the rejection so logs and
    /// tests can distinguish the cause.
    pub async fn redeem(
        pool: &PgPool,
        code_hash: &str,
        client_id: Uuid,
        redirect_uri: &str,
    ) -> Result<Result<Self, RedemptionRejection>, sqlx::Error> {
        let redeemed = sqlx::query_as::<_, Self>(
            r"
            UPDATE authorization_codes
            SET redeemed_at = NOW()
            WHERE code_hash = $1
              AND client_id = $2
              AND redirect_uri = $3
              AND redeemed_at IS NULL
              AND expires_at > NOW()
            RETURNING id, code_hash, client_id, user_id, tenant_id, redirect_uri, scope,
                      created_at, expires_at, redeemed_at
            ",
        )
        .bind(code_hash)
        .bind(client_id)
        .bind(redirect_uri)
        .fetch_optional(pool)
        .await?;

        if let Some(code) = redeemed {
            return Ok(Ok(code));
        }

        let existing = Self::find_by_code_hash(pool, code_hash).await?;
        Ok(Err(Self::classify_rejection(
            existing.as_ref(),
            client_id,
            redirect_uri,
        )))
    }

    /// Classify why the conditional update matched no row.
    fn classify_rejection(
        existing: Option<&Self>,
        client_id: Uuid,
        redirect_uri: &str,
    ) -> RedemptionRejection {
        let Some(code) = existing else {
            return RedemptionRejection::NotFound;
        };

        if code.is_redeemed() {
            RedemptionRejection::AlreadyRedeemed
        } else if code.is_expired() {
            RedemptionRejection::Expired
        } else if code.client_id != client_id {
            RedemptionRejection::ClientMismatch
        } else if code.redirect_uri != redirect_uri {
            RedemptionRejection::RedirectUriMismatch
        } else {
            // The row became redeemable-looking between the UPDATE and this
            // read (a concurrent winner committed in the window). Treat as
            // already redeemed.
            RedemptionRejection::AlreadyRedeemed
        }
    }

    /// Find a code row by the digest of its value.
    pub async fn find_by_code_hash(
        pool: &PgPool,
        code_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, code_hash, client_id, user_id, tenant_id, redirect_uri, scope,
                   created_at, expires_at, redeemed_at
            FROM authorization_codes
            WHERE code_hash = $1
            ",
        )
        .bind(code_hash)
        .fetch_optional(pool)
        .await
    }

    /// Delete expired code rows (for the external housekeeping job).
    ///
    /// Unexpired rows are never deleted, redeemed or not; they are the audit
    /// trail replay detection reads.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r"
            DELETE FROM authorization_codes
            WHERE expires_at < NOW()
            ",
        )
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

/// Data for creating a new authorization code row.
#[derive(Debug, Clone)]
pub struct NewAuthorizationCode {
    pub code_hash: String,
    pub client_id: Uuid,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub redirect_uri: String,
    pub scope: String,
    pub expires_at: DateTime<Utc>,
}

impl NewAuthorizationCode {
    /// Create a new code row with the standard 10-minute expiry window.
    #[must_use]
    pub fn new(
        code_hash: String,
        client_id: Uuid,
        user_id: Uuid,
        tenant_id: Uuid,
        redirect_uri: String,
        scope: String,
    ) -> Self {
        Self {
            code_hash,
            client_id,
            user_id,
            tenant_id,
            redirect_uri,
            scope,
            expires_at: Utc::now() + Duration::minutes(AUTH_CODE_EXPIRY_MINUTES),
        }
    }

    /// Override the expiry (test setup for the expired-code path).
    #[must_use]
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = expires_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_code(client_id: Uuid, redirect_uri: &str) -> AuthorizationCode {
        AuthorizationCode {
            id: Uuid::new_v4(),
            code_hash: "digest".to_string(),
            client_id,
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            redirect_uri: redirect_uri.to_string(),
            scope: "household:read household:write".to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::minutes(AUTH_CODE_EXPIRY_MINUTES),
            redeemed_at: None,
        }
    }

    #[test]
    fn test_fresh_code_is_not_expired_or_redeemed() {
        let code = sample_code(Uuid::new_v4(), "https://app.example/cb");
        assert!(!code.is_expired());
        assert!(!code.is_redeemed());
    }

    #[test]
    fn test_typed_id_accessors() {
        let code = sample_code(Uuid::new_v4(), "https://app.example/cb");
        assert_eq!(code.tenant_id().as_uuid(), &code.tenant_id);
        assert_eq!(code.user_id().as_uuid(), &code.user_id);
    }

    #[test]
    fn test_expired_code() {
        let mut code = sample_code(Uuid::new_v4(), "https://app.example/cb");
        code.expires_at = Utc::now() - Duration::minutes(1);
        assert!(code.is_expired());
    }

    #[test]
    fn test_classify_not_found() {
        let rejection = AuthorizationCode::classify_rejection(
            None,
            Uuid::new_v4(),
            "https://app.example/cb",
        );
        assert_eq!(rejection, RedemptionRejection::NotFound);
    }

    #[test]
    fn test_classify_already_redeemed_takes_precedence() {
        let client_id = Uuid::new_v4();
        let mut code = sample_code(client_id, "https://app.example/cb");
        code.redeemed_at = Some(Utc::now());
        // Also expired: replay detection still wins the classification
        code.expires_at = Utc::now() - Duration::minutes(1);

        let rejection = AuthorizationCode::classify_rejection(
            Some(&code),
            client_id,
            "https://app.example/cb",
        );
        assert_eq!(rejection, RedemptionRejection::AlreadyRedeemed);
    }

    #[test]
    fn test_classify_expired() {
        let client_id = Uuid::new_v4();
        let mut code = sample_code(client_id, "https://app.example/cb");
        code.expires_at = Utc::now() - Duration::minutes(1);

        let rejection = AuthorizationCode::classify_rejection(
            Some(&code),
            client_id,
            "https://app.example/cb",
        );
        assert_eq!(rejection, RedemptionRejection::Expired);
    }

    #[test]
    fn test_classify_client_mismatch() {
        let code = sample_code(Uuid::new_v4(), "https://app.example/cb");

        let rejection = AuthorizationCode::classify_rejection(
            Some(&code),
            Uuid::new_v4(),
            "https://app.example/cb",
        );
        assert_eq!(rejection, RedemptionRejection::ClientMismatch);
    }

    #[test]
    fn test_classify_redirect_uri_mismatch() {
        let client_id = Uuid::new_v4();
        let code = sample_code(client_id, "https://app.example/cb");

        let rejection = AuthorizationCode::classify_rejection(
            Some(&code),
            client_id,
            "https://app.example/other",
        );
        assert_eq!(rejection, RedemptionRejection::RedirectUriMismatch);
    }

    #[test]
    fn test_classify_lost_race_reads_as_already_redeemed() {
        // All fields match and the row looks redeemable: the conditional
        // update must have lost to a concurrent winner.
        let client_id = Uuid::new_v4();
        let code = sample_code(client_id, "https://app.example/cb");

        let rejection = AuthorizationCode::classify_rejection(
            Some(&code),
            client_id,
            "https://app.example/cb",
        );
        assert_eq!(rejection, RedemptionRejection::AlreadyRedeemed);
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(RedemptionRejection::NotFound.to_string(), "not_found");
        assert_eq!(
            RedemptionRejection::AlreadyRedeemed.to_string(),
            "already_redeemed"
        );
        assert_eq!(
            RedemptionRejection::RedirectUriMismatch.to_string(),
            "redirect_uri_mismatch"
        );
    }

    #[test]
    fn test_new_code_expiry_window() {
        let new = NewAuthorizationCode::new(
            "digest".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            "https://app.example/cb".to_string(),
            "household:read".to_string(),
        );

        let window = new.expires_at - Utc::now();
        assert!(window <= Duration::minutes(AUTH_CODE_EXPIRY_MINUTES));
        assert!(window > Duration::minutes(AUTH_CODE_EXPIRY_MINUTES - 1));
    }
}
