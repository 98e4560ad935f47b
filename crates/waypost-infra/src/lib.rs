//! # Waypost Infrastructure
//!
//! Concrete implementations of the ports defined in `waypost-core`.
//! This crate contains the document-store adapters and the auth
//! service integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory stores only
//! - `mongo` - MongoDB document store with 2dsphere geo index
//! - `auth` - JWT + Argon2 authentication

pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use store::{InMemoryCommentStore, InMemoryPostStore, InMemoryUserStore};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - MongoDB
#[cfg(feature = "mongo")]
pub use store::{MongoConfig, MongoStores};
