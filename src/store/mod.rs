//! Persistence for chunks, contents and the revision ledger.
//!
//! Everything lives in one SQLite database. Chunk, content and segment rows
//! are append-only; the only multi-row mutation is a snapshot, which runs
//! inside a single transaction.
//!
//! - [`ChunkStore`] / [`ContentIndex`] - Deduplication seams used by ingestion
//! - [`Catalog`] - SQLite implementation of both, plus ledger queries
//! - Typed row identifiers ([`ChunkId`], [`ContentId`], ...)

mod catalog;
mod ids;
mod ledger;
mod models;
pub(crate) mod schema;
mod traits;

pub use catalog::Catalog;
pub use ids::{ChunkId, ContentId, FileId, RevisionId, SnapshotId};
pub use models::{RepositoryStats, RevisionInfo, SegmentInfo, SnapshotInfo};
pub use traits::{ChunkStore, ContentIndex};
