use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::hasher::AnyHasher;
use crate::{Result, VerifyError};

/// Digest algorithms accepted for artifact verification.
///
/// Names parse case-sensitively from their canonical upper-case spelling,
/// so `"SHA256"` is accepted and `"sha256"` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA384")]
    Sha384,
    #[serde(rename = "SHA512")]
    Sha512,
    #[serde(rename = "MD5")]
    Md5,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Sha1,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Md5,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Sha1 => "SHA1",
            Algorithm::Sha256 => "SHA256",
            Algorithm::Sha384 => "SHA384",
            Algorithm::Sha512 => "SHA512",
            Algorithm::Md5 => "MD5",
        }
    }

    /// Length of the raw digest in bytes. The hex form is twice as long.
    pub fn digest_len(self) -> usize {
        match self {
            Algorithm::Sha1 => 20,
            Algorithm::Sha256 => 32,
            Algorithm::Sha384 => 48,
            Algorithm::Sha512 => 64,
            Algorithm::Md5 => 16,
        }
    }

    /// Fresh incremental hasher for this algorithm.
    pub fn hasher(self) -> AnyHasher { AnyHasher::new(self) }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for Algorithm {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == s)
            .ok_or_else(|| VerifyError::UnsupportedAlgorithm(s.to_owned()))
    }
}

/// An expected digest: algorithm plus a well-formed hex string of the
/// algorithm's digest length. Either hex case is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    algorithm: Algorithm,
    hex:       String,
}

impl Checksum {
    pub fn new(algorithm: Algorithm, hex: impl Into<String>) -> Result<Self> {
        let hex = hex.into();
        let raw = hex::decode(&hex).map_err(|_| VerifyError::InvalidChecksum {
            algorithm,
            reason: "not a hexadecimal string",
        })?;
        if raw.len() != algorithm.digest_len() {
            return Err(VerifyError::InvalidChecksum {
                algorithm,
                reason: "wrong digest length",
            });
        }
        Ok(Self { algorithm, hex })
    }

    /// Parse both the algorithm name and the hex digest.
    pub fn parse(algorithm: &str, hex: &str) -> Result<Self> { Self::new(algorithm.parse()?, hex) }

    pub fn algorithm(&self) -> Algorithm { self.algorithm }

    pub fn hex(&self) -> &str { &self.hex }

    /// Case-insensitive comparison against a computed hex digest.
    pub fn matches(&self, actual_hex: &str) -> bool { digests_match(&self.hex, actual_hex) }
}

/// The one hex digest comparison used everywhere: ASCII case is ignored and
/// surrounding whitespace trimmed.
pub fn digests_match(expected_hex: &str, actual_hex: &str) -> bool {
    expected_hex.trim().eq_ignore_ascii_case(actual_hex.trim())
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}
