//! Registered third-party client entity model.
//!
//! Clients are created out-of-band by the integration-management surface;
//! the delegated-authorization subsystem only reads them.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A registered third-party integration permitted to request delegated
/// access to a household member's account.
#[derive(Debug, Clone, FromRow)]
pub struct OAuthClient {
    /// Internal unique identifier.
    pub id: Uuid,

    /// Public client identifier (opaque string, unique).
    pub client_id: String,

    /// Display name shown on the consent page.
    pub name: String,

    /// Argon2id hash of the client secret (PHC format).
    pub secret_hash: Option<String>,

    /// Exact-match allow-list of redirect URIs.
    pub redirect_uris: Vec<String>,

    /// A client is usable only while active.
    pub is_active: bool,

    /// When the client was registered.
    pub created_at: DateTime<Utc>,

    /// When the client was last modified.
    pub updated_at: DateTime<Utc>,
}

impl OAuthClient {
    /// Check whether a candidate redirect URI is on the allow-list.
    ///
    /// Exact string comparison only; no wildcard, prefix, or normalization
    /// logic.
    #[must_use]
    pub fn allows_redirect_uri(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|r| r == uri)
    }

    /// Find a client by its public `client_id`.
    pub async fn find_by_client_id(
        pool: &PgPool,
        client_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r"
            SELECT id, client_id, name, secret_hash, redirect_uris, is_active,
                   created_at, updated_at
            FROM oauth_clients
            WHERE client_id = $1
            ",
        )
        .bind(client_id)
        .fetch_optional(pool)
        .await
    }

    /// Create a new client registration.
    ///
    /// Registration happens out-of-band; this exists for bootstrap and test
    /// setup.
    pub async fn create(pool: &PgPool, new: &NewOAuthClient) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            r"
            INSERT INTO oauth_clients (client_id, name, secret_hash, redirect_uris, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, client_id, name, secret_hash, redirect_uris, is_active,
                      created_at, updated_at
            ",
        )
        .bind(&new.client_id)
        .bind(&new.name)
        .bind(&new.secret_hash)
        .bind(&new.redirect_uris)
        .bind(new.is_active)
        .fetch_one(pool)
        .await
    }

}

/// Data for creating a new client registration.
#[derive(Debug, Clone)]
pub struct NewOAuthClient {
    pub client_id: String,
    pub name: String,
    pub secret_hash: Option<String>,
    pub redirect_uris: Vec<String>,
    pub is_active: bool,
}

impl NewOAuthClient {
    /// Create a new active client registration.
    #[must_use]
    pub fn new(
        client_id: String,
        name: String,
        secret_hash: Option<String>,
        redirect_uris: Vec<String>,
    ) -> Self {
        Self {
            client_id,
            name,
            secret_hash,
            redirect_uris,
            is_active: true,
        }
    }
}
