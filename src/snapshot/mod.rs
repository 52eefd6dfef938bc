//! Atomic batches of revisions.
//!
//! A [`Snapshot`] owns the repository's only write transaction. Files added
//! to it become revisions that are durable and visible once
//! [`Snapshot::finish`] commits; [`Snapshot::abort`], or dropping the handle,
//! discards them.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::{debug, info, warn};

use crate::chunker::Chunker;
use crate::error::{DbContext, Error, Result};
use crate::ingest::{IngestOutcome, ensure_content};
use crate::store::{Catalog, ContentId, RevisionId, SnapshotId};

/// One revision of a committed snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedRevision {
    /// Path the file was added under.
    pub path: String,
    /// The new revision.
    pub revision: RevisionId,
    /// Content the file resolved to.
    pub content: ContentId,
    /// File size in bytes.
    pub size: u64,
    /// True when the content was already stored before this snapshot.
    pub reused: bool,
}

/// Result of [`Snapshot::finish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// Snapshot id.
    pub id: SnapshotId,
    /// Time the snapshot was opened.
    pub time: DateTime<Utc>,
    /// Free-form note.
    pub note: String,
    /// Revisions in the order they were added.
    pub revisions: Vec<CommittedRevision>,
}

impl SnapshotSummary {
    /// Number of files whose content was new to the repository.
    pub fn new_contents(&self) -> usize {
        self.revisions.iter().filter(|r| !r.reused).count()
    }
}

/// An open snapshot.
///
/// Holds an immediate transaction on the repository connection, so no other
/// writer can interleave and the repository cannot be read through the same
/// handle until the snapshot is finished or aborted.
pub struct Snapshot<'r> {
    tx: Transaction<'r>,
    id: SnapshotId,
    time: DateTime<Utc>,
    note: String,
    chunker: Chunker,
    added: Vec<CommittedRevision>,
}

impl<'r> Snapshot<'r> {
    pub(crate) fn begin(conn: &'r mut Connection, note: &str, chunker: Chunker) -> Result<Self> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("opening a snapshot")?;
        let time = Utc::now();
        let id = Catalog::new(&tx).insert_snapshot(time, note)?;
        debug!(snapshot = %id, note, "snapshot opened");

        Ok(Self {
            tx,
            id,
            time,
            note: note.to_owned(),
            chunker,
            added: Vec::new(),
        })
    }

    /// The note given when the snapshot was opened.
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Number of files added so far.
    pub fn len(&self) -> usize {
        self.added.len()
    }

    /// True when nothing was added yet.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }

    /// Records the bytes of `reader` as the revision of `path` in this
    /// snapshot.
    ///
    /// Runs in a savepoint: on error every row this call created is rolled
    /// back and the snapshot stays usable, though callers normally abort.
    /// Adding the same path twice to one snapshot is an error.
    pub fn add_file<R: Read + Seek>(&mut self, path: &str, reader: &mut R) -> Result<IngestOutcome> {
        let chunker = self.chunker;
        let snapshot = self.id;

        let sp = self.tx.savepoint().context("opening a savepoint")?;
        let result = record(&Catalog::new(&sp), &chunker, snapshot, path, reader);
        let (revision, outcome) = match result {
            Ok(recorded) => recorded,
            Err(e) => {
                warn!(path, error = %e, "file not added to snapshot");
                return Err(e);
            }
        };
        sp.commit().context("releasing a savepoint")?;

        self.added.push(CommittedRevision {
            path: path.to_owned(),
            revision,
            content: outcome.content,
            size: outcome.size,
            reused: outcome.reused,
        });
        Ok(outcome)
    }

    /// Opens `path` and adds it under its UTF-8 path string.
    pub fn add_path(&mut self, path: &Path) -> Result<IngestOutcome> {
        let key = path
            .to_str()
            .ok_or_else(|| Error::msg(format!("path is not valid UTF-8: {}", path.display())))?;
        let mut reader = BufReader::new(File::open(path)?);
        self.add_file(key, &mut reader)
    }

    /// Commits every revision added so far.
    pub fn finish(self) -> Result<SnapshotSummary> {
        let Self {
            tx,
            id,
            time,
            note,
            added,
            ..
        } = self;
        tx.commit().context("committing a snapshot")?;

        let reused = added.iter().filter(|r| r.reused).count();
        info!(snapshot = %id, files = added.len(), reused, "snapshot committed");
        Ok(SnapshotSummary {
            id,
            time,
            note,
            revisions: added,
        })
    }

    /// Discards every revision added so far.
    pub fn abort(self) -> Result<()> {
        let files = self.added.len();
        let id = self.id;
        self.tx.rollback().context("aborting a snapshot")?;
        info!(snapshot = %id, files, "snapshot aborted");
        Ok(())
    }
}

fn record<R: Read + Seek>(
    catalog: &Catalog<'_>,
    chunker: &Chunker,
    snapshot: SnapshotId,
    path: &str,
    reader: &mut R,
) -> Result<(RevisionId, IngestOutcome)> {
    let file = catalog.resolve_file(path)?;
    let outcome = ensure_content(catalog, chunker, reader)?;
    let revision = catalog.insert_revision(file, snapshot, outcome.content)?;
    debug!(path, %revision, content = %outcome.content, reused = outcome.reused, "file added");
    Ok((revision, outcome))
}
