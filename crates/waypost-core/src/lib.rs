//! # Waypost Core
//!
//! The domain layer of the Waypost backend: entities, validation, the
//! store/auth ports, and the content and feed services that keep the
//! User/Post/Comment relation graph consistent.
//! This crate contains pure business logic with zero infrastructure
//! dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
