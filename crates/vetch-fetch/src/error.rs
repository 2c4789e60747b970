//! Error types for vetch-fetch.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("size probe failed for {url}: {reason}")]
    Probe { url: String, reason: &'static str },

    #[error("transfer failed: {0}")]
    Transfer(#[source] BoxError),

    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    #[error("transfer reported success but {} does not exist", .0.display())]
    MissingArtifact(PathBuf),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("cleanup failed: {0}")]
    Removal(#[source] vetch_fs::Error),

    #[error("filesystem error: {0}")]
    Filesystem(#[source] vetch_fs::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("download failed after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last:     Box<FetchError>,
    },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Caller and configuration errors are not retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            FetchError::FileNotFound(_)
                | FetchError::UnsupportedAlgorithm(_)
                | FetchError::InvalidRequest(_)
                | FetchError::InvalidConfig(_)
                | FetchError::ConfigParse(_)
                | FetchError::RetriesExhausted { .. }
        )
    }

    /// Integrity failures, after which the artifact has been removed.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            FetchError::SizeMismatch { .. } | FetchError::HashMismatch { .. }
        )
    }
}

impl From<vetch_fs::Error> for FetchError {
    fn from(e: vetch_fs::Error) -> Self {
        match e {
            vetch_fs::Error::NotAFile(path) => FetchError::FileNotFound(path),
            e @ vetch_fs::Error::Remove { .. } => FetchError::Removal(e),
            e => FetchError::Filesystem(e),
        }
    }
}

impl From<vetch_verify::VerifyError> for FetchError {
    fn from(e: vetch_verify::VerifyError) -> Self {
        use vetch_verify::VerifyError;

        match e {
            VerifyError::FileNotFound(path) => FetchError::FileNotFound(path),
            VerifyError::UnsupportedAlgorithm(name) => FetchError::UnsupportedAlgorithm(name),
            e @ VerifyError::InvalidChecksum { .. } => FetchError::InvalidRequest(e.to_string()),
            VerifyError::Io(e) => FetchError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
