//! Revision domain entities.

pub mod model;
pub mod state;
pub mod summary;

pub use model::{NewRevision, Revision, RevisionRow};
pub use state::RevisionState;
pub use summary::RevisionSummary;
