use std::path::Path;
use std::time::Duration;

use crate::data::AttemptOutcome;
use crate::error::{FetchError, Result};

/// Delay before the next attempt.
///
/// Deliberately constant: every gap between attempts is `base`, regardless of
/// how many attempts have already failed.
pub fn retry_delay(_attempt: u32, base: Duration) -> Duration { base }

/// Classify the result of one attempt for the retry loop.
///
/// `Ok(false)` means the attempt ended without an artifact at `destination`
/// and is reported as [`FetchError::MissingArtifact`].
pub fn classify(result: Result<bool>, destination: &Path) -> AttemptOutcome {
    match result {
        Ok(true) => AttemptOutcome::Success,
        Ok(false) => {
            AttemptOutcome::RecoverableFailure(FetchError::MissingArtifact(destination.to_path_buf()))
        }
        Err(e) if e.is_retryable() => AttemptOutcome::RecoverableFailure(e),
        Err(e) => AttemptOutcome::TerminalFailure(e),
    }
}
