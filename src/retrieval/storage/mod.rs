//! Query execution seam and the in-memory snippet store.

pub mod executor;
pub mod memory_store;

pub use executor::{QueryExecutor, SnippetRow};
pub use memory_store::{InMemorySnippetStore, StoreError, similarity_cosine};
