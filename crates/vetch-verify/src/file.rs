use std::fs::File;
use std::io;
use std::path::Path;

use crate::{Algorithm, Result, VerifiedReader, VerifyError, digests_match};

/// Read size used when streaming a file through a hasher.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Compute the lowercase hex digest of the file at `path`.
///
/// The file is streamed in [`CHUNK_SIZE`] chunks; it is never loaded whole.
/// Fails with [`VerifyError::FileNotFound`] unless `path` is a regular file.
pub fn digest_file(path: &Path, algorithm: Algorithm) -> Result<String> {
    let file = open_regular(path)?;
    let mut reader = VerifiedReader::new(file, algorithm.hasher());
    reader.drain(CHUNK_SIZE)?;
    Ok(hex::encode(reader.into_digest()))
}

/// Compare the file's digest with `expected_hex` through [`digests_match`].
pub fn verify_file(path: &Path, algorithm: Algorithm, expected_hex: &str) -> Result<bool> {
    let actual = digest_file(path, algorithm)?;
    Ok(digests_match(expected_hex, &actual))
}

fn open_regular(path: &Path) -> Result<File> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(File::open(path)?),
        Ok(_) => Err(VerifyError::FileNotFound(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(VerifyError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
