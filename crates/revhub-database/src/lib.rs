//! # revhub-database
//!
//! The [`RevisionStore`] contract the versioning engine consumes, with a
//! PostgreSQL implementation, an in-memory implementation, and pool and
//! migration management.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryRevisionStore;
pub use repositories::PgRevisionRepository;
pub use store::RevisionStore;
