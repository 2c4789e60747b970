use std::io;
use std::path::PathBuf;

use crate::Algorithm;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("not a regular file: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid {algorithm} checksum: {reason}")]
    InvalidChecksum {
        algorithm: Algorithm,
        reason:    &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;
