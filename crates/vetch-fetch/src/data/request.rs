use std::path::{Path, PathBuf};

use vetch_verify::Checksum;

use crate::error::{FetchError, Result};

/// A single artifact to fetch: where from, where to, and what it must hash to.
///
/// The expected size is not part of the request; it is probed from the
/// server at the start of each attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    source_url:  String,
    destination: PathBuf,
    validate:    bool,
    checksum:    Option<Checksum>,
}

impl DownloadRequest {
    pub fn new(source_url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_url:  source_url.into(),
            destination: destination.into(),
            validate:    false,
            checksum:    None,
        }
    }

    /// Require verification against `checksum`.
    pub fn checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self.validate = true;
        self
    }

    /// Toggle verification without changing the stored checksum.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn source_url(&self) -> &str { &self.source_url }

    pub fn destination(&self) -> &Path { &self.destination }

    pub fn validate(&self) -> bool { self.validate }

    pub fn expected_checksum(&self) -> Option<&Checksum> { self.checksum.as_ref() }

    /// The checksum to verify against, if verification was requested.
    ///
    /// Fails when verification is requested without a checksum.
    pub fn verification(&self) -> Result<Option<&Checksum>> {
        if !self.validate {
            return Ok(None);
        }
        self.checksum.as_ref().map(Some).ok_or_else(|| {
            FetchError::InvalidRequest(format!(
                "validation requested for {} without a checksum",
                self.destination.display()
            ))
        })
    }
}
