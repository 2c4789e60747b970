//! HTTP downloading with resume decisions, integrity verification and
//! bounded retry.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Pipeline
//!
//! [`Fetcher::download_with_retry`] runs up to `max_attempts` attempts, each of
//! which:
//!
//! 1. keeps a leftover destination file whose digest already matches, or
//!    deletes it;
//! 2. resolves one redirect hop of the source URL;
//! 3. probes `Content-Length` with a HEAD request;
//! 4. hands the transfer to a [`TransferAgent`];
//! 5. verifies size and digest, deleting the artifact on mismatch.
//!
//! # Example
//!
//! ```no_run
//! use vetch_fetch::{Algorithm, Checksum, DownloadRequest, FetchConfig, Fetcher};
//!
//! # async fn run() -> vetch_fetch::Result<()> {
//! let fetcher = Fetcher::with_reqwest(FetchConfig::default())?;
//! let checksum = Checksum::new(
//!     Algorithm::Sha256,
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
//! )?;
//! let request = DownloadRequest::new("https://example.com/tool.zip", "/tmp/tool.zip")
//!     .checksum(checksum);
//!
//! fetcher.download_with_retry(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{is_redirect, parse_content_length};
pub use data::{AttemptOutcome, DownloadRequest, FetchConfig, IntegrityVerdict, PartialFile};
pub use effects::downloader::Downloader;
pub use effects::fetcher::Fetcher;
pub use effects::http::{BoxStream, HttpClient};
pub use effects::integrity::{IntegrityChecker, verify_file};
pub use effects::log::{Logger, Severity, TracingLogger};
pub use effects::redirect::RedirectResolver;
pub use effects::remover::FileRemover;
pub use effects::retry::RetryOrchestrator;
pub use effects::transfer::{HttpTransfer, HttpTransferError, TransferAgent};
pub use error::{BoxError, FetchError, Result};
pub use vetch_verify::{Algorithm, Checksum};

#[cfg(feature = "reqwest")]
pub use effects::http::ReqwestClient;
