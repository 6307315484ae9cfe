//! # revhub-entity
//!
//! Domain entity models for RevHub. [`revision::Revision`] is the single
//! persisted record type; [`revision::RevisionRow`] is its database row
//! shape and derives `sqlx::FromRow`.

pub mod revision;

pub use revision::{NewRevision, Revision, RevisionRow, RevisionState, RevisionSummary};
