//! Hearth core library.
//!
//! Shared types for the Hearth household-operations platform.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (`TenantId`, `UserId`)
//!
//! # Example
//!
//! ```
//! use hearth_core::{TenantId, UserId};
//!
//! let household = TenantId::new();
//! let member = UserId::new();
//! ```

pub mod ids;

pub use ids::{ParseIdError, TenantId, UserId};
