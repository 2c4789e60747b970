//! Content verification primitives for downloaded artifacts.
//!
//! Provides incremental hashing over a fixed set of digest algorithms and
//! file-level verification that streams content instead of buffering it.
//!
//! # Key Features
//!
//! - **Streaming**: files are hashed chunk by chunk through [`VerifiedReader`]
//! - **Runtime selection**: [`Algorithm`] picks one of SHA1/SHA256/SHA384/SHA512/MD5
//! - **Case-insensitive**: expected hex digests match in either case
//!
//! # Example
//!
//! ```
//! use std::io::Read;
//! use vetch_verify::{Checksum, VerifiedReader};
//!
//! let expected = Checksum::parse(
//!     "SHA256",
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
//! )
//! .unwrap();
//!
//! let mut reader = VerifiedReader::new(&b"hello world"[..], expected.algorithm().hasher());
//! let mut buffer = Vec::new();
//! reader.read_to_end(&mut buffer).unwrap();
//!
//! assert!(expected.matches(&hex::encode(reader.into_digest())));
//! ```

pub use self::algorithm::{Algorithm, Checksum, digests_match};
pub use self::error::{Result, VerifyError};
pub use self::file::{CHUNK_SIZE, digest_file, verify_file};
pub use self::hasher::{AnyHasher, DigestHasher, Hasher};
pub use self::reader::VerifiedReader;

mod algorithm;
mod error;
mod file;
mod hasher;
mod reader;
