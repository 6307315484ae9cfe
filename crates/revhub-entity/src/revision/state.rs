//! Revision lifecycle state.
//!
//! Storage encodes the state as one signed integer (`n` active, `-n`
//! superseded). Everything above the row decoder works with the tagged
//! form, so a zero version or a double negation cannot be expressed.

use std::fmt;

use serde::{Deserialize, Serialize};

use revhub_core::error::AppError;
use revhub_core::result::AppResult;

/// Where a revision sits in its file's history, with its sequence number.
///
/// Sequence numbers start at 1 and are never reused for the same file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "sequence", rename_all = "snake_case")]
pub enum RevisionState {
    /// The single live revision of a file name.
    Active(u32),
    /// A historical revision that was active under this sequence number.
    Superseded(u32),
}

impl RevisionState {
    /// The first revision of a new file name.
    pub const FIRST: Self = Self::Active(1);

    /// Build an active state, rejecting sequence number 0.
    pub fn active(sequence: u32) -> AppResult<Self> {
        Self::check_sequence(sequence)?;
        Ok(Self::Active(sequence))
    }

    /// Build a superseded state, rejecting sequence number 0.
    pub fn superseded(sequence: u32) -> AppResult<Self> {
        Self::check_sequence(sequence)?;
        Ok(Self::Superseded(sequence))
    }

    fn check_sequence(sequence: u32) -> AppResult<()> {
        if sequence == 0 || sequence > i32::MAX as u32 {
            return Err(AppError::validation(format!(
                "Version must be between 1 and {}, got {sequence}",
                i32::MAX
            )));
        }
        Ok(())
    }

    /// The sequence number, independent of state.
    pub fn sequence(self) -> u32 {
        match self {
            Self::Active(n) | Self::Superseded(n) => n,
        }
    }

    /// Whether this is the live revision.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// The state after this revision is replaced by a newer one.
    ///
    /// Fails if the revision was already superseded.
    pub fn supersede(self) -> AppResult<Self> {
        match self {
            Self::Active(n) => Ok(Self::Superseded(n)),
            Self::Superseded(n) => Err(AppError::conflict(format!(
                "Revision {n} is already superseded"
            ))),
        }
    }

    /// The state of the revision that replaces this one.
    pub fn successor(self) -> AppResult<Self> {
        let next = self
            .sequence()
            .checked_add(1)
            .ok_or_else(|| AppError::internal("Version counter overflow"))?;
        Self::active(next)
    }

    /// The signed storage encoding.
    pub fn to_signed(self) -> i32 {
        match self {
            Self::Active(n) => n as i32,
            Self::Superseded(n) => -(n as i32),
        }
    }

    /// Decode the signed storage encoding. `0` means a corrupt row.
    pub fn from_signed(version: i32) -> AppResult<Self> {
        match version {
            0 => Err(AppError::database("Stored revision has version 0")),
            i32::MIN => Err(AppError::database("Stored revision version out of range")),
            v if v > 0 => Ok(Self::Active(v as u32)),
            v => Ok(Self::Superseded(v.unsigned_abs())),
        }
    }
}

impl fmt::Display for RevisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active(n) => write!(f, "active v{n}"),
            Self::Superseded(n) => write!(f, "superseded v{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_encoding() {
        assert_eq!(RevisionState::Active(3).to_signed(), 3);
        assert_eq!(RevisionState::Superseded(3).to_signed(), -3);
        assert_eq!(RevisionState::from_signed(2).unwrap(), RevisionState::Active(2));
        assert_eq!(
            RevisionState::from_signed(-7).unwrap(),
            RevisionState::Superseded(7)
        );
        assert!(RevisionState::from_signed(0).is_err());
    }

    #[test]
    fn test_supersede_only_once() {
        let state = RevisionState::Active(4).supersede().unwrap();
        assert_eq!(state, RevisionState::Superseded(4));
        assert!(state.supersede().is_err());
    }

    #[test]
    fn test_successor_keeps_counting_from_either_state() {
        assert_eq!(
            RevisionState::Active(1).successor().unwrap(),
            RevisionState::Active(2)
        );
        assert_eq!(
            RevisionState::Superseded(5).successor().unwrap(),
            RevisionState::Active(6)
        );
        assert!(RevisionState::Active(i32::MAX as u32).successor().is_err());
    }

    #[test]
    fn test_zero_sequence_rejected() {
        assert!(RevisionState::active(0).is_err());
        assert!(RevisionState::superseded(0).is_err());
        assert_eq!(RevisionState::FIRST.sequence(), 1);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(RevisionState::Superseded(2)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "superseded", "sequence": 2}));
    }
}
