//! Results of mutating operations.

use revhub_core::error::AppError;

/// What happened to the mirror after a record commit.
#[derive(Debug, Clone)]
pub enum MirrorStatus {
    /// The mirror matches the committed record.
    Synced,
    /// The mirror step failed; the record stays committed.
    ///
    /// Always of kind `MirrorWriteFailed`.
    Failed(AppError),
}

impl MirrorStatus {
    /// Whether the mirror step succeeded.
    pub fn is_synced(&self) -> bool {
        matches!(self, Self::Synced)
    }

    /// The mirror failure, if any.
    pub fn failure(&self) -> Option<&AppError> {
        match self {
            Self::Synced => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// A committed record change together with its mirror outcome.
#[derive(Debug, Clone)]
pub struct Committed<T> {
    /// The committed value.
    pub value: T,
    /// Outcome of the best-effort mirror step.
    pub mirror: MirrorStatus,
}

impl<T> Committed<T> {
    /// Wrap a value and its mirror outcome.
    pub fn new(value: T, mirror: MirrorStatus) -> Self {
        Self { value, mirror }
    }

    /// A change that needed no mirror step.
    pub fn synced(value: T) -> Self {
        Self::new(value, MirrorStatus::Synced)
    }

    /// Transform the committed value, keeping the mirror outcome.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Committed<U> {
        Committed {
            value: f(self.value),
            mirror: self.mirror,
        }
    }
}
