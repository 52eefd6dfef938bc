//! Pull-based chunking over a reader.

use std::io::Read;

use bytes::Bytes;

use crate::buffer::WorkBuffer;
use crate::cdc::find_boundary;
use crate::chunk::{Chunk, Digest};
use crate::config::ChunkConfig;
use crate::error::{Error, Result};

/// An iterator that yields chunks from a reader.
///
/// `ChunkIter` fills a working buffer of `buffer_capacity` bytes, cuts one
/// chunk from its front, and keeps the remainder for the next scan. The
/// iterator ends after the first error.
///
/// # Example
///
/// ```
/// use chunkvault::{ChunkConfig, Chunker};
/// use std::io::Cursor;
///
/// let data = b"short input";
/// let chunker = Chunker::new(ChunkConfig::default());
/// let chunks = chunker.chunk(Cursor::new(&data[..])).collect::<Result<Vec<_>, _>>()?;
///
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].data.as_ref(), data);
/// # Ok::<(), chunkvault::Error>(())
/// ```
pub struct ChunkIter<R> {
    reader: R,
    config: ChunkConfig,
    buffer: Option<WorkBuffer>,
    sequence: u32,
    offset: u64,
    finished: bool,
}

impl<R: Read> ChunkIter<R> {
    pub(crate) fn new(reader: R, config: ChunkConfig) -> Self {
        Self {
            reader,
            config,
            buffer: None,
            sequence: 0,
            offset: 0,
            finished: false,
        }
    }

    /// Number of chunks emitted so far.
    pub fn emitted(&self) -> u32 {
        self.sequence
    }

    /// Bytes consumed into emitted chunks so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.buffer.is_none() {
            self.config.validate()?;
            self.buffer = Some(WorkBuffer::new(self.config.buffer_capacity())?);
        }
        let Some(buffer) = self.buffer.as_mut() else {
            return Ok(None);
        };

        buffer.fill_from(&mut self.reader)?;
        if buffer.is_empty() {
            return Ok(None);
        }

        let len = find_boundary(buffer.filled());
        let data = Bytes::copy_from_slice(&buffer.filled()[..len]);
        buffer.consume(len);

        let mut chunk = Chunk::new(self.sequence, self.offset, data);
        if self.config.hash_config().enabled {
            chunk.hash = Some(Digest::of(&chunk.data));
        }

        self.sequence = self
            .sequence
            .checked_add(1)
            .ok_or_else(|| Error::msg("stream produced more than u32::MAX chunks"))?;
        self.offset += len as u64;
        Ok(Some(chunk))
    }
}

impl<R: Read> Iterator for ChunkIter<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
