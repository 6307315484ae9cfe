//! Versioning engine: revision lifecycle, queries, folders, and mirror
//! reconciliation.

pub mod commit;
pub mod folder;
pub mod query;
pub mod reconcile;
pub mod service;

pub use commit::{Committed, MirrorStatus};
pub use query::{DownloadedFile, HealthReport};
pub use reconcile::{ReconcileFailure, ReconcileReport};
pub use service::{UpdateRequest, UploadRequest, VersioningService};
