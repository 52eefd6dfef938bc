//! Fixed-capacity byte buffer with explicit fill and consume.

use std::io::{ErrorKind, Read};

use crate::error::Result;

/// Owned buffer holding the unconsumed prefix of a stream.
#[derive(Debug)]
pub(crate) struct WorkBuffer {
    data: Vec<u8>,
    filled: usize,
    eof: bool,
}

impl WorkBuffer {
    /// Allocates a buffer of exactly `capacity` bytes.
    pub(crate) fn new(capacity: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)?;
        data.resize(capacity, 0);
        Ok(Self {
            data,
            filled: 0,
            eof: false,
        })
    }

    /// Reads until the buffer is full or the reader is exhausted.
    ///
    /// Returns the number of bytes appended.
    pub(crate) fn fill_from<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        let before = self.filled;
        while !self.eof && self.filled < self.data.len() {
            match reader.read(&mut self.data[self.filled..]) {
                Ok(0) => self.eof = true,
                Ok(n) => self.filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(self.filled - before)
    }

    /// The unconsumed bytes.
    pub(crate) fn filled(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    /// Discards the first `n` bytes, keeping the rest at the front.
    pub(crate) fn consume(&mut self, n: usize) {
        debug_assert!(n <= self.filled);
        self.data.copy_within(n..self.filled, 0);
        self.filled -= n;
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.filled == 0
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    /// True once the reader has reported end of stream.
    #[cfg(test)]
    pub(crate) fn is_eof(&self) -> bool {
        self.eof
    }
}
