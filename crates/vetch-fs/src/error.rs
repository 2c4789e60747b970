use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("failed to remove {}: {source}", path.display())]
    Remove {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to inspect {}: {source}", path.display())]
    Metadata {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
