//! Immutable configuration and value types.

pub mod config;
pub mod outcome;
pub mod request;

pub use config::FetchConfig;
pub use outcome::{AttemptOutcome, IntegrityVerdict, PartialFile};
pub use request::DownloadRequest;
