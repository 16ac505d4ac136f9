//! Hearth persistence layer.
//!
//! PostgreSQL-backed storage for the delegated-authorization subsystem:
//! the registered-client registry, one-time authorization codes, and
//! long-lived access tokens.
//!
//! # Modules
//!
//! - [`pool`] - Connection pool bootstrap
//! - [`migrations`] - Embedded, versioned schema migrations
//! - [`models`] - Entity models with their query methods
//!
//! # Example
//!
//! ```rust,ignore
//! use hearth_db::{run_migrations, DbPool};
//!
//! let pool = DbPool::connect("postgres://localhost/hearth").await?;
//! run_migrations(&pool).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use pool::DbPool;
