//! # revhub-service
//!
//! The versioning engine. [`VersioningService`] implements upload, update,
//! rollback, deletion, and history queries over a [`RevisionStore`] and
//! keeps the filesystem mirror of active content in step with it.
//!
//! Dependencies are injected at construction time via `Arc` references.
//!
//! [`RevisionStore`]: revhub_database::RevisionStore

pub mod lock;
pub mod versioning;

pub use lock::NameLocks;
pub use versioning::{
    Committed, DownloadedFile, HealthReport, MirrorStatus, ReconcileFailure, ReconcileReport,
    UpdateRequest, UploadRequest, VersioningService,
};
