//! Turning a file's bytes into a content.
//!
//! A content is identified by the digest of the whole byte sequence. Known
//! contents are reused without chunking; new ones are chunked and every
//! chunk is found or stored before its segment is recorded.

use std::io::{Read, Seek, SeekFrom};

use tracing::debug;

use crate::chunk::Digest;
use crate::chunker::Chunker;
use crate::error::{Error, Result};
use crate::hash::{Blake3Hasher, hash_reader};
use crate::store::{ChunkStore, ContentId, ContentIndex};

/// What [`ensure_content`] did with one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOutcome {
    /// The content the stream resolved to.
    pub content: ContentId,
    /// Whole-stream digest.
    pub hash: Digest,
    /// Stream length in bytes.
    pub size: u64,
    /// True when the content already existed and nothing was chunked.
    pub reused: bool,
    /// Segments recorded for a new content; zero when reused.
    pub chunks: u32,
    /// Chunks that were not already in the store.
    pub new_chunks: u32,
}

/// Resolves `reader` to a content, creating it if its digest is new.
///
/// The stream is read from its start twice on a miss: once to compute the
/// whole-stream digest and once to chunk it. If the second pass yields
/// different bytes the call fails, leaving the partial rows to the caller's
/// enclosing transaction.
pub fn ensure_content<S, R>(store: &S, chunker: &Chunker, reader: &mut R) -> Result<IngestOutcome>
where
    S: ChunkStore + ContentIndex + ?Sized,
    R: Read + Seek,
{
    reader.seek(SeekFrom::Start(0))?;
    let (hash, size) = hash_reader(reader)?;

    if let Some(content) = store.find_content(&hash)? {
        debug!(%content, %hash, size, "content reused");
        return Ok(IngestOutcome {
            content,
            hash,
            size,
            reused: true,
            chunks: 0,
            new_chunks: 0,
        });
    }

    let content = store.create_content(&hash)?;
    reader.seek(SeekFrom::Start(0))?;

    let mut rehash = Blake3Hasher::new();
    let mut seen = 0u64;
    let mut new_chunks = 0u32;
    let chunks = chunker.for_each_chunk(&mut *reader, |chunk| {
        rehash.update(&chunk.data);
        seen += chunk.len() as u64;

        let digest = chunk.digest();
        let id = match store.find_chunk(&digest)? {
            Some(id) => id,
            None => {
                new_chunks += 1;
                store.store_chunk(&digest, &chunk.data)?
            }
        };
        store.append_segment(content, chunk.sequence, id)
    })?;

    if seen != size || rehash.finalize() != hash {
        return Err(Error::msg("file changed while being read"));
    }

    debug!(%content, %hash, size, chunks, new_chunks, "content created");
    Ok(IngestOutcome {
        content,
        hash,
        size,
        reused: false,
        chunks,
        new_chunks,
    })
}
