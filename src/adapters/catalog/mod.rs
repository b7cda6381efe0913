//! Catalog adapters - Implementations of the `CandidateCatalog` port.
//!
//! - `InMemoryCatalog` - Fixed candidate list, used in tests and when no database is configured
//! - `PostgresCatalog` - Reads the `dishes` and `like` tables

mod in_memory;
mod postgres;

pub use in_memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;
