use std::io;
use std::path::Path;

use vetch_verify::{Algorithm, Checksum};

use crate::data::{IntegrityVerdict, PartialFile};
use crate::effects::log::{Logger, Severity};
use crate::effects::remover::FileRemover;
use crate::error::{FetchError, Result};

const SOURCE: &str = "integrity";

/// Size and digest checks over completed or partial artifacts.
pub struct IntegrityChecker<'a> {
    logger: &'a dyn Logger,
}

impl<'a> IntegrityChecker<'a> {
    pub fn new(logger: &'a dyn Logger) -> Self { Self { logger } }

    /// Evaluate `path` without touching it.
    ///
    /// The digest is only computed when the size matches.
    pub async fn verdict(
        &self,
        path: &Path,
        expected_size: u64,
        algorithm: Algorithm,
        expected_hex: &str,
    ) -> Result<IntegrityVerdict> {
        let canonical = vetch_fs::canonical_file(path)?;
        let actual_size = vetch_fs::file_len(&canonical)?;
        if actual_size != expected_size {
            return Ok(IntegrityVerdict {
                actual_size,
                size_match: false,
                actual_digest: None,
                hash_match: None,
            });
        }

        let digest = blocking(move || vetch_verify::digest_file(&canonical, algorithm)).await?;
        let hash_match = vetch_verify::digests_match(expected_hex, &digest);
        Ok(IntegrityVerdict {
            actual_size,
            size_match: true,
            actual_digest: Some(digest),
            hash_match: Some(hash_match),
        })
    }

    /// Full post-transfer check.
    ///
    /// On a size or digest mismatch the artifact is removed before the error
    /// is returned, so no corrupted file is left at rest.
    pub async fn check_full(
        &self,
        path: &Path,
        expected_size: u64,
        algorithm: Algorithm,
        expected_hex: &str,
    ) -> Result<()> {
        let verdict = self.verdict(path, expected_size, algorithm, expected_hex).await?;

        if !verdict.size_match {
            self.logger.log(
                &format!(
                    "{}: expected {expected_size} bytes, found {}",
                    path.display(),
                    verdict.actual_size
                ),
                Severity::Error,
                SOURCE,
            );
            FileRemover::new(self.logger).remove(path)?;
            return Err(FetchError::SizeMismatch {
                expected: expected_size,
                actual:   verdict.actual_size,
            });
        }

        if verdict.hash_match != Some(true) {
            let actual = verdict.actual_digest.unwrap_or_default();
            self.logger.log(
                &format!(
                    "{}: {algorithm} digest {actual} does not match {expected_hex}",
                    path.display()
                ),
                Severity::Error,
                SOURCE,
            );
            FileRemover::new(self.logger).remove(path)?;
            return Err(FetchError::HashMismatch {
                expected: expected_hex.to_owned(),
                actual,
            });
        }

        self.logger.log(
            &format!("{} passed size and {algorithm} checks", path.display()),
            Severity::Info,
            SOURCE,
        );
        Ok(())
    }

    /// Digest-only check used for the resume decision.
    ///
    /// There is no trustworthy expected size for a leftover file, so only the
    /// hash is compared. A file that cannot be read counts as [`PartialFile::Invalid`].
    pub async fn check_partial(&self, path: &Path, checksum: &Checksum) -> PartialFile {
        if !vetch_fs::exists(path) {
            return PartialFile::Absent;
        }
        let (owned, algorithm, expected) =
            (path.to_path_buf(), checksum.algorithm(), checksum.hex().to_owned());
        match blocking(move || vetch_verify::verify_file(&owned, algorithm, &expected)).await {
            Ok(true) => PartialFile::Valid,
            Ok(false) => PartialFile::Invalid,
            Err(e) => {
                self.logger.log(
                    &format!("could not hash {}: {e}", path.display()),
                    Severity::Warning,
                    SOURCE,
                );
                PartialFile::Invalid
            }
        }
    }
}

/// Hash on the blocking pool so large files do not stall the executor.
async fn blocking<T, F>(hash: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> vetch_verify::Result<T> + Send + 'static,
{
    let value = tokio::task::spawn_blocking(hash)
        .await
        .map_err(io::Error::other)??;
    Ok(value)
}

/// Standalone integrity check, independent of downloading.
///
/// `Ok(true)` when both size and digest match. `Ok(false)` on either
/// mismatch, in which case the file has been removed. Errors are reserved for
/// a missing file and for a removal that failed.
pub async fn verify_file(
    logger: &dyn Logger,
    path: &Path,
    expected_size: u64,
    algorithm: Algorithm,
    expected_hex: &str,
) -> Result<bool> {
    match IntegrityChecker::new(logger)
        .check_full(path, expected_size, algorithm, expected_hex)
        .await
    {
        Ok(()) => Ok(true),
        Err(e) if e.is_integrity_failure() => Ok(false),
        Err(e) => Err(e),
    }
}
