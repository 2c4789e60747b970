use digest::Digest;

use crate::Algorithm;

pub trait Hasher: Send {
    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Vec<u8>;
}

/// Adapter from any RustCrypto [`Digest`] to [`Hasher`].
pub struct DigestHasher<D: Digest + Send>(D);

impl<D: Digest + Send> DigestHasher<D> {
    pub fn new() -> Self { Self(D::new()) }
}

impl<D: Digest + Send> Default for DigestHasher<D> {
    fn default() -> Self { Self::new() }
}

impl<D: Digest + Send> Hasher for DigestHasher<D> {
    fn update(&mut self, data: &[u8]) { Digest::update(&mut self.0, data); }

    fn finalize(self) -> Vec<u8> { self.0.finalize().to_vec() }
}

/// Hasher selected at runtime from an [`Algorithm`].
pub enum AnyHasher {
    Sha1(DigestHasher<sha1::Sha1>),
    Sha256(DigestHasher<sha2::Sha256>),
    Sha384(DigestHasher<sha2::Sha384>),
    Sha512(DigestHasher<sha2::Sha512>),
    Md5(DigestHasher<md5::Md5>),
}

impl AnyHasher {
    pub fn new(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Sha1 => Self::Sha1(DigestHasher::new()),
            Algorithm::Sha256 => Self::Sha256(DigestHasher::new()),
            Algorithm::Sha384 => Self::Sha384(DigestHasher::new()),
            Algorithm::Sha512 => Self::Sha512(DigestHasher::new()),
            Algorithm::Md5 => Self::Md5(DigestHasher::new()),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Sha1(_) => Algorithm::Sha1,
            Self::Sha256(_) => Algorithm::Sha256,
            Self::Sha384(_) => Algorithm::Sha384,
            Self::Sha512(_) => Algorithm::Sha512,
            Self::Md5(_) => Algorithm::Md5,
        }
    }
}

impl Hasher for AnyHasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha1(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
            Self::Md5(h) => h.update(data),
        }
    }

    fn finalize(self) -> Vec<u8> {
        match self {
            Self::Sha1(h) => h.finalize(),
            Self::Sha256(h) => h.finalize(),
            Self::Sha384(h) => h.finalize(),
            Self::Sha512(h) => h.finalize(),
            Self::Md5(h) => h.finalize(),
        }
    }
}
