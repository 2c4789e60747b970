use std::io::{self, Read};

use crate::Hasher;

/// Streaming reader that hashes data as it passes through.
/// Wraps any `Read` source so a file is hashed chunk by chunk.
pub struct VerifiedReader<R, H> {
    reader: R,
    hasher: H,
    consumed: u64,
}

impl<R, H> VerifiedReader<R, H> {
    pub fn new(reader: R, hasher: H) -> Self {
        Self {
            reader,
            hasher,
            consumed: 0,
        }
    }
}

impl<R: Read, H: Hasher> Read for VerifiedReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.consumed += n as u64;
        }
        Ok(n)
    }
}

impl<R: Read, H: Hasher> VerifiedReader<R, H> {
    /// Drain the remaining input through the hasher using a fixed-size buffer.
    ///
    /// Interrupted reads are retried. Returns the total bytes hashed.
    pub fn drain(&mut self, chunk_size: usize) -> io::Result<u64> {
        let mut buffer = vec![0u8; chunk_size.max(1)];
        loop {
            match self.read(&mut buffer) {
                Ok(0) => return Ok(self.consumed),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    pub fn into_digest(self) -> Vec<u8> { self.hasher.finalize() }
}
