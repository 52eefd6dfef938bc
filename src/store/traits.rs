//! Deduplication seams used by the ingest protocol.

use crate::chunk::Digest;
use crate::error::Result;

use super::{ChunkId, ContentId};

/// Stores each distinct chunk exactly once, keyed by its digest.
pub trait ChunkStore {
    /// Exact lookup by digest. No side effects.
    fn find_chunk(&self, hash: &Digest) -> Result<Option<ChunkId>>;

    /// Persists `bytes` under `hash` and returns its id.
    ///
    /// Callers look up with [`ChunkStore::find_chunk`] first and only store
    /// on a miss. Implementations must still return the existing id when the
    /// digest is already present.
    fn store_chunk(&self, hash: &Digest, bytes: &[u8]) -> Result<ChunkId>;
}

/// Maps whole-file digests to contents and their ordered segments.
pub trait ContentIndex {
    /// Exact lookup by whole-file digest.
    fn find_content(&self, hash: &Digest) -> Result<Option<ContentId>>;

    /// Allocates a content id for a digest not seen before.
    fn create_content(&self, hash: &Digest) -> Result<ContentId>;

    /// Records that chunk `chunk` is segment number `sequence` of `content`.
    fn append_segment(&self, content: ContentId, sequence: u32, chunk: ChunkId) -> Result<()>;
}
