//! SQLite implementation of the chunk store and content index.

use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

use crate::chunk::Digest;
use crate::error::{DbContext, Error, Result};

use super::{ChunkId, ChunkStore, ContentId, ContentIndex, SegmentInfo};

/// Typed access to the repository tables through a borrowed connection.
///
/// The connection may be a plain [`Connection`], an open transaction or a
/// savepoint; writes land in whichever scope is borrowed.
#[derive(Clone, Copy)]
pub struct Catalog<'c> {
    pub(super) conn: &'c Connection,
}

impl<'c> Catalog<'c> {
    /// Wraps a connection.
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Streams a content's chunk payloads in ascending sequence order.
    ///
    /// `f` receives the sequence number and the chunk bytes, or `None` when
    /// the segment references a chunk row that no longer exists or holds no
    /// blob.
    pub fn for_each_content_chunk<F>(&self, content: ContentId, mut f: F) -> Result<()>
    where
        F: FnMut(u32, Option<&[u8]>) -> Result<()>,
    {
        let context = "reading the chunks of a content";
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT s.sequence, c.contents FROM segment s
                 LEFT JOIN chunk c ON c.chunk_id = s.chunk_id
                 WHERE s.content_id = ?1
                 ORDER BY s.sequence ASC",
            )
            .context(context)?;
        let mut rows = stmt.query(params![content]).context(context)?;

        while let Some(row) = rows.next().context(context)? {
            let sequence: u32 = row.get(0).context(context)?;
            let bytes = row
                .get_ref(1)
                .context(context)?
                .as_blob_or_null()
                .map_err(|e| {
                    Error::Corruption(format!(
                        "content {content} segment {sequence} holds a non-blob chunk: {e}"
                    ))
                })?;
            f(sequence, bytes)?;
        }
        Ok(())
    }

    /// All segments of a content in ascending sequence order.
    pub fn segments(&self, content: ContentId) -> Result<Vec<SegmentInfo>> {
        let context = "listing segments";
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT s.sequence, s.chunk_id, c.hash, length(c.contents) FROM segment s
                 JOIN chunk c ON c.chunk_id = s.chunk_id
                 WHERE s.content_id = ?1
                 ORDER BY s.sequence ASC",
            )
            .context(context)?;
        let rows = stmt
            .query_map(params![content], |row| {
                Ok(SegmentInfo {
                    sequence: row.get(0)?,
                    chunk: row.get(1)?,
                    chunk_hash: row.get(2)?,
                    len: row.get::<_, i64>(3)? as u64,
                })
            })
            .context(context)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().context(context)
    }

    /// Whole-file digest of a content.
    pub fn content_hash(&self, content: ContentId) -> Result<Digest> {
        self.conn
            .query_row(
                "SELECT hash FROM content WHERE content_id = ?1",
                params![content],
                |row| row.get(0),
            )
            .optional()
            .context("looking up a content")?
            .ok_or_else(|| Error::not_found("content", content))
    }

    /// Payload of one chunk.
    pub fn chunk_bytes(&self, chunk: ChunkId) -> Result<Vec<u8>> {
        self.conn
            .query_row(
                "SELECT contents FROM chunk WHERE chunk_id = ?1",
                params![chunk],
                |row| row.get(0),
            )
            .optional()
            .context("reading a data chunk")?
            .ok_or_else(|| Error::not_found("chunk", chunk))
    }
}

impl ChunkStore for Catalog<'_> {
    fn find_chunk(&self, hash: &Digest) -> Result<Option<ChunkId>> {
        let context = "finding a data chunk";
        self.conn
            .prepare_cached("SELECT chunk_id FROM chunk WHERE hash = ?1")
            .context(context)?
            .query_row(params![hash], |row| row.get(0))
            .optional()
            .context(context)
    }

    fn store_chunk(&self, hash: &Digest, bytes: &[u8]) -> Result<ChunkId> {
        let inserted = self
            .conn
            .prepare_cached(
                "INSERT INTO chunk(hash, contents) VALUES (?1, ?2)
                 ON CONFLICT(hash) DO NOTHING",
            )
            .context("storing a data chunk")?
            .execute(params![hash, bytes])
            .context("storing a data chunk")?;

        if inserted == 1 {
            let id = ChunkId::new(self.conn.last_insert_rowid());
            debug!(chunk = %id, %hash, len = bytes.len(), "stored chunk");
            return Ok(id);
        }

        self.find_chunk(hash)?
            .ok_or_else(|| Error::msg(format!("chunk {hash} missing after insert")))
    }
}

impl ContentIndex for Catalog<'_> {
    fn find_content(&self, hash: &Digest) -> Result<Option<ContentId>> {
        let context = "finding a content";
        self.conn
            .prepare_cached("SELECT content_id FROM content WHERE hash = ?1")
            .context(context)?
            .query_row(params![hash], |row| row.get(0))
            .optional()
            .context(context)
    }

    fn create_content(&self, hash: &Digest) -> Result<ContentId> {
        let context = "creating a content";
        self.conn
            .prepare_cached("INSERT INTO content(hash) VALUES (?1)")
            .context(context)?
            .execute(params![hash])
            .context(context)?;
        Ok(ContentId::new(self.conn.last_insert_rowid()))
    }

    fn append_segment(&self, content: ContentId, sequence: u32, chunk: ChunkId) -> Result<()> {
        let context = "storing a segment";
        self.conn
            .prepare_cached(
                "INSERT INTO segment(content_id, sequence, chunk_id) VALUES (?1, ?2, ?3)",
            )
            .context(context)?
            .execute(params![content, sequence, chunk])
            .context(context)?;
        Ok(())
    }
}
