//! Core chunking engine.
//!
//! # Example
//!
//! ```
//! use chunkvault::{ChunkConfig, Chunker};
//! use std::io::Cursor;
//!
//! let data = vec![0u8; 10 * 1024];
//! let chunker = Chunker::new(ChunkConfig::default());
//!
//! let mut lengths = Vec::new();
//! chunker.for_each_chunk(Cursor::new(&data), |chunk| {
//!     lengths.push(chunk.len());
//!     Ok(())
//! })?;
//!
//! // A uniform window never hashes below the threshold, so only the
//! // buffer capacity cuts.
//! assert_eq!(lengths, vec![8000, 2240]);
//! # Ok::<(), chunkvault::Error>(())
//! ```

use std::io::Read;

use bytes::Bytes;

use crate::cdc::find_boundary;
use crate::chunk::{Chunk, Digest};
use crate::config::ChunkConfig;
use crate::error::Result;

use super::ChunkIter;

/// Splits byte streams into content-defined chunks.
///
/// `Chunker` holds a configuration and is cheap to copy. Each stream is
/// chunked with fresh state, so the same bytes always produce the same
/// chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunker {
    config: ChunkConfig,
}

impl Chunker {
    /// Creates a new chunker with the given configuration.
    pub fn new(config: ChunkConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration used by this chunker.
    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Creates a chunking iterator from a reader.
    ///
    /// The iterator reads lazily and yields each chunk as soon as its
    /// boundary is known.
    pub fn chunk<R: Read>(&self, reader: R) -> ChunkIter<R> {
        ChunkIter::new(reader, self.config)
    }

    /// Feeds every chunk of `reader` to `handler`, in order.
    ///
    /// Stops at the first read error or handler error and returns it
    /// unchanged. On success returns the number of chunks emitted.
    pub fn for_each_chunk<R, F>(&self, reader: R, mut handler: F) -> Result<u32>
    where
        R: Read,
        F: FnMut(Chunk) -> Result<()>,
    {
        let mut count = 0;
        for chunk in self.chunk(reader) {
            handler(chunk?)?;
            count += 1;
        }
        Ok(count)
    }

    /// Chunks an in-memory buffer.
    ///
    /// Produces exactly the chunks [`Chunker::chunk`] would for the same
    /// bytes, as zero-copy slices of `data`. Fails with
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the buffer
    /// capacity does not exceed the window.
    pub fn chunk_bytes(&self, data: impl Into<Bytes>) -> Result<Vec<Chunk>> {
        self.config.validate()?;
        let data = data.into();
        let capacity = self.config.buffer_capacity();
        let hashing = self.config.hash_config().enabled;

        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut sequence = 0u32;

        while start < data.len() {
            let window_end = data.len().min(start + capacity);
            let len = find_boundary(&data[start..window_end]);
            let slice = data.slice(start..start + len);

            let mut chunk = Chunk::new(sequence, start as u64, slice);
            if hashing {
                chunk.hash = Some(Digest::of(&chunk.data));
            }
            chunks.push(chunk);

            start += len;
            sequence += 1;
        }

        Ok(chunks)
    }
}
