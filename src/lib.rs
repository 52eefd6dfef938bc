//! chunkvault
//!
//! A deduplicating, content-addressed backup engine.
//!
//! Files are split into content-defined chunks, each chunk is stored once
//! under its BLAKE3 digest, and every version of a file is recorded as a
//! revision inside an atomic snapshot. Restoring a revision reassembles the
//! file from its chunks in order.
//!
//! Two levels of deduplication apply:
//!
//! - a file whose whole-content digest is already known is not chunked at all
//! - otherwise only chunks not yet in the store are written
//!
//! Everything is kept in one SQLite database.
//!
//! # Backing up a directory
//!
//! ```no_run
//! use chunkvault::{Repository, RepositoryConfig};
//!
//! fn main() -> chunkvault::Result<()> {
//!     let mut repo = Repository::open("db.chunkvault", RepositoryConfig::default())?;
//!     let summary = repo.snapshot_tree("/home/me/documents", "nightly")?;
//!
//!     for rev in &summary.revisions {
//!         println!("{} -> revision {}", rev.path, rev.revision);
//!     }
//!     repo.restore_to_path(summary.revisions[0].revision, "/tmp/restored")?;
//!     Ok(())
//! }
//! ```
//!
//! # Chunking only
//!
//! ```
//! use chunkvault::{ChunkConfig, Chunker};
//!
//! let data = vec![7u8; 20_000];
//! let chunks = Chunker::new(ChunkConfig::default()).chunk_bytes(data)?;
//! assert!(chunks.iter().all(|c| c.len() <= 8000));
//! # Ok::<(), chunkvault::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer; // internal working buffer

pub mod cdc;
mod chunk;
mod chunker;
mod config;
mod error;
mod hash;
mod ingest;
mod repository;
mod restore;
mod snapshot;
pub mod store;
mod walk;

pub use chunk::{Chunk, Digest};
pub use chunker::{ChunkIter, Chunker};
pub use config::{
    ChunkConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_BUSY_TIMEOUT, HashConfig, RepositoryConfig,
};
pub use error::{Error, Result};
pub use hash::{Blake3Hasher, hash_reader};
pub use ingest::{IngestOutcome, ensure_content};
pub use repository::Repository;
pub use restore::restore_content;
pub use snapshot::{CommittedRevision, Snapshot, SnapshotSummary};
pub use store::{
    Catalog, ChunkId, ChunkStore, ContentId, ContentIndex, FileId, RepositoryStats, RevisionId,
    RevisionInfo, SegmentInfo, SnapshotId, SnapshotInfo,
};
pub use walk::{enumerate_files, is_skipped};
