//! Store adapters.

mod memory;

#[cfg(feature = "mongo")]
pub mod mongo;

pub use memory::{InMemoryCommentStore, InMemoryPostStore, InMemoryUserStore};

#[cfg(feature = "mongo")]
pub use mongo::{MongoConfig, MongoStores};

#[cfg(test)]
mod tests;
