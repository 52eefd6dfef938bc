//! BLAKE3-based content hashing.

use std::io::{ErrorKind, Read};

use crate::chunk::Digest;
use crate::error::Result;

/// Scratch size used when hashing a reader.
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// A hasher that computes BLAKE3 digests.
#[derive(Debug, Clone, Default)]
pub struct Blake3Hasher {
    state: blake3::Hasher,
}

impl Blake3Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Returns the digest of everything fed so far.
    pub fn finalize(&self) -> Digest {
        self.state.finalize().into()
    }

    /// Resets the hasher to its initial state.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Hashes data in one shot.
    pub fn hash(data: &[u8]) -> Digest {
        Digest::of(data)
    }
}

/// Streams `reader` to its end and returns the digest of its bytes along
/// with the number of bytes read.
pub fn hash_reader<R: Read>(reader: &mut R) -> Result<(Digest, u64)> {
    let mut hasher = Blake3Hasher::new();
    let mut buf = Vec::new();
    buf.try_reserve_exact(READ_BUFFER_SIZE)?;
    buf.resize(READ_BUFFER_SIZE, 0);

    let mut total = 0u64;
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buf[..n]);
                total += n as u64;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok((hasher.finalize(), total))
}
