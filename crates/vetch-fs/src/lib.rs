//! Filesystem probes and forced removal for download artifacts.

mod error;
mod probe;
mod remove;

pub use error::{Error, Result};
pub use probe::{canonical_file, exists, file_len, size_of};
pub use remove::{Removal, remove};
