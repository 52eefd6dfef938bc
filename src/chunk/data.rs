//! The Chunk type - one content-defined piece of a stream.

use bytes::Bytes;
use std::fmt;

use super::Digest;

/// A content-defined chunk with its position in the source stream.
///
/// # Example
///
/// ```
/// use chunkvault::Chunk;
/// use bytes::Bytes;
///
/// let chunk = Chunk::new(0, 0, Bytes::from_static(b"hello world"));
///
/// assert_eq!(chunk.len(), 11);
/// assert_eq!(chunk.range(), 0..11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position of this chunk among the stream's chunks.
    pub sequence: u32,

    /// Byte offset of the first byte in the source stream.
    pub offset: u64,

    /// The chunk bytes.
    pub data: Bytes,

    /// BLAKE3 digest of `data`, when hashing is enabled.
    pub hash: Option<Digest>,
}

impl Chunk {
    /// Creates a chunk without a digest.
    pub fn new(sequence: u32, offset: u64, data: impl Into<Bytes>) -> Self {
        Self {
            sequence,
            offset,
            data: data.into(),
            hash: None,
        }
    }

    /// Sets the digest.
    pub fn set_hash(mut self, hash: Digest) -> Self {
        self.hash = Some(hash);
        self
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the attached digest, or computes it.
    pub fn digest(&self) -> Digest {
        self.hash.unwrap_or_else(|| Digest::of(&self.data))
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the chunk as a range of the source stream.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.offset..self.end()
    }

    /// Consumes the chunk and returns the underlying data.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk#{}({} bytes @ {}", self.sequence, self.len(), self.offset)?;
        if let Some(hash) = self.hash {
            write!(f, ", hash={}", hash)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let chunk = Chunk::new(3, 100, &b"hello"[..]);
        assert_eq!(chunk.len(), 5);
        assert_eq!(chunk.sequence, 3);
        assert!(!chunk.is_empty());
        assert!(chunk.hash.is_none());
    }

    #[test]
    fn test_range() {
        let chunk = Chunk::new(0, 100, &b"hello"[..]);
        assert_eq!(chunk.end(), 105);
        assert_eq!(chunk.range(), 100..105);
    }

    #[test]
    fn test_digest_computed_when_missing() {
        let chunk = Chunk::new(0, 0, &b"hello"[..]);
        assert_eq!(chunk.digest(), Digest::of(b"hello"));

        let fixed = Digest::new([1u8; 32]);
        let chunk = chunk.set_hash(fixed);
        assert_eq!(chunk.digest(), fixed);
    }

    #[test]
    fn test_display() {
        let chunk = Chunk::new(2, 100, &b"hello"[..]);
        let s = format!("{}", chunk);
        assert!(s.contains("#2"));
        assert!(s.contains("5 bytes"));
        assert!(s.contains("@ 100"));
    }
}
