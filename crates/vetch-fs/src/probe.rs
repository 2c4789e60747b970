use std::io;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub fn exists(path: &Path) -> bool { path.symlink_metadata().is_ok() }

/// Byte length of the file at `path`, or 0 when nothing is there.
pub fn size_of(path: &Path) -> u64 { std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0) }

/// Canonical form of `path`, which must resolve to a regular file.
pub fn canonical_file(path: &Path) -> Result<PathBuf> {
    let canonical = match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::NotAFile(path.to_path_buf()));
        }
        Err(source) => {
            return Err(Error::Metadata {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let meta = std::fs::metadata(&canonical).map_err(|source| Error::Metadata {
        path: canonical.clone(),
        source,
    })?;
    if meta.is_file() {
        Ok(canonical)
    } else {
        Err(Error::NotAFile(path.to_path_buf()))
    }
}

/// Byte length of a file that is known to exist.
pub fn file_len(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|meta| meta.len())
        .map_err(|source| Error::Metadata {
            path: path.to_path_buf(),
            source,
        })
}
