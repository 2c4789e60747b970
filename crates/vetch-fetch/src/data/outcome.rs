use std::fmt;

use crate::error::FetchError;

/// State of whatever sits at the destination before a transfer begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialFile {
    Absent,
    /// Digest matches; the transfer can be skipped.
    Valid,
    /// Digest differs or the file is unreadable; it must be removed.
    Invalid,
}

impl fmt::Display for PartialFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartialFile::Absent => write!(f, "absent"),
            PartialFile::Valid => write!(f, "valid"),
            PartialFile::Invalid => write!(f, "invalid"),
        }
    }
}

/// Result of evaluating a file against an expected size and digest.
///
/// The digest is only computed when the size matches, so `hash_match` and
/// `actual_digest` stay `None` after a size mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityVerdict {
    pub actual_size:   u64,
    pub size_match:    bool,
    pub actual_digest: Option<String>,
    pub hash_match:    Option<bool>,
}

impl IntegrityVerdict {
    pub fn passed(&self) -> bool { self.size_match && self.hash_match == Some(true) }
}

/// How a single attempt ended, as seen by the retry loop.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success,
    RecoverableFailure(FetchError),
    TerminalFailure(FetchError),
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool { matches!(self, AttemptOutcome::Success) }
}
