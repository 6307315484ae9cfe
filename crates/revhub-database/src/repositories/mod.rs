//! Repository implementations backed by PostgreSQL.

pub mod revision;

pub use revision::PgRevisionRepository;
