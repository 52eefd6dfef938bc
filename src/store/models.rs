//! Read-side views of ledger rows.

use chrono::{DateTime, Utc};

use crate::chunk::Digest;

use super::{ChunkId, ContentId, RevisionId, SnapshotId};

/// One committed revision: what `path` contained as of `snapshot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionInfo {
    /// Revision id.
    pub id: RevisionId,
    /// File path as recorded at ingest.
    pub path: String,
    /// Snapshot the revision belongs to.
    pub snapshot: SnapshotId,
    /// Snapshot time.
    pub time: DateTime<Utc>,
    /// Content the file had.
    pub content: ContentId,
    /// Whole-file digest of that content.
    pub content_hash: Digest,
}

/// A committed snapshot and the number of revisions it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// Snapshot id.
    pub id: SnapshotId,
    /// When the snapshot was opened.
    pub time: DateTime<Utc>,
    /// Free-form note given at creation.
    pub note: String,
    /// Number of revisions in the snapshot.
    pub revisions: u64,
}

/// One ordered chunk reference of a content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInfo {
    /// Position in reconstruction order.
    pub sequence: u32,
    /// Referenced chunk.
    pub chunk: ChunkId,
    /// Digest of the referenced chunk.
    pub chunk_hash: Digest,
    /// Length of the referenced chunk.
    pub len: u64,
}

/// Row counts and stored payload size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryStats {
    /// Distinct chunks.
    pub chunks: u64,
    /// Sum of distinct chunk payload sizes.
    pub stored_bytes: u64,
    /// Distinct whole-file contents.
    pub contents: u64,
    /// Known file paths.
    pub files: u64,
    /// Committed snapshots.
    pub snapshots: u64,
    /// Committed revisions.
    pub revisions: u64,
}
