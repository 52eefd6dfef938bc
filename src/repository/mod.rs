//! The repository handle.
//!
//! # Example
//!
//! ```
//! use chunkvault::{Repository, RepositoryConfig};
//! use std::io::Cursor;
//!
//! let mut repo = Repository::open_in_memory(RepositoryConfig::default())?;
//!
//! let mut snapshot = repo.begin_snapshot("nightly")?;
//! snapshot.add_file("notes.txt", &mut Cursor::new(b"remember the milk".to_vec()))?;
//! let summary = snapshot.finish()?;
//!
//! let mut restored = Vec::new();
//! repo.restore(summary.revisions[0].revision, &mut restored)?;
//! assert_eq!(restored, b"remember the milk");
//! # Ok::<(), chunkvault::Error>(())
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Seek, Write};
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{info, warn};

use crate::chunker::Chunker;
use crate::config::RepositoryConfig;
use crate::error::{DbContext, Error, Result};
use crate::restore::restore_content;
use crate::snapshot::{Snapshot, SnapshotSummary};
use crate::store::{
    Catalog, ContentId, RepositoryStats, RevisionId, RevisionInfo, SegmentInfo, SnapshotId,
    SnapshotInfo, schema,
};
use crate::walk::enumerate_files;

/// A backup repository stored in one SQLite database.
///
/// All writes go through a [`Snapshot`]. While one is open it mutably
/// borrows the repository, so there is at most one writer per handle and
/// no reads observe half-written state. The tables themselves are not
/// reachable from outside the crate:
///
/// ```compile_fail
/// use chunkvault::{Repository, RepositoryConfig};
///
/// let repo = Repository::open_in_memory(RepositoryConfig::default()).unwrap();
/// let _ = repo.catalog();
/// ```
pub struct Repository {
    conn: Connection,
    config: RepositoryConfig,
    // Canonical paths of the database and its journal siblings.
    own_files: Vec<PathBuf>,
}

impl Repository {
    /// Opens or creates the repository at `path`.
    pub fn open(path: impl AsRef<Path>, config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();
        let conn = Connection::open(path).context("opening the database")?;
        schema::init(&conn, config.busy_timeout())?;
        let own_files = database_files(&fs::canonicalize(path)?);
        info!(path = %path.display(), "repository opened");
        Ok(Self {
            conn,
            config,
            own_files,
        })
    }

    /// Opens a repository that lives only as long as the handle.
    pub fn open_in_memory(config: RepositoryConfig) -> Result<Self> {
        config.validate()?;
        let conn = Connection::open_in_memory().context("opening the database")?;
        schema::init(&conn, config.busy_timeout())?;
        Ok(Self {
            conn,
            config,
            own_files: Vec::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub(crate) fn catalog(&self) -> Catalog<'_> {
        Catalog::new(&self.conn)
    }

    fn chunker(&self) -> Chunker {
        Chunker::new(*self.config.chunk_config())
    }

    /// Opens a snapshot.
    ///
    /// Waits up to the configured busy timeout for another process's writer
    /// to finish.
    pub fn begin_snapshot(&mut self, note: &str) -> Result<Snapshot<'_>> {
        let chunker = self.chunker();
        Snapshot::begin(&mut self.conn, note, chunker)
    }

    /// Stores one file from disk in a snapshot of its own.
    pub fn ingest_file(&mut self, path: impl AsRef<Path>) -> Result<RevisionId> {
        let path = path.as_ref();
        let note = format!("ingest {}", path.display());
        let mut snapshot = self.begin_snapshot(&note)?;
        snapshot.add_path(path)?;
        let summary = snapshot.finish()?;
        single_revision(summary)
    }

    /// Stores the bytes of `reader` as `path` in a snapshot of its own.
    pub fn ingest_reader<R: Read + Seek>(&mut self, path: &str, reader: &mut R) -> Result<RevisionId> {
        let note = format!("ingest {path}");
        let mut snapshot = self.begin_snapshot(&note)?;
        snapshot.add_file(path, reader)?;
        let summary = snapshot.finish()?;
        single_revision(summary)
    }

    /// Snapshots every regular file under `root`.
    ///
    /// Hidden entries, names starting with `~` and the repository's own
    /// database files are skipped. The first failure aborts the whole
    /// snapshot and is returned.
    pub fn snapshot_tree(&mut self, root: impl AsRef<Path>, note: &str) -> Result<SnapshotSummary> {
        let mut files = enumerate_files(root.as_ref())?;
        files.retain(|file| !self.is_own_file(file));
        let mut snapshot = self.begin_snapshot(note)?;

        for file in &files {
            if let Err(e) = snapshot.add_path(file) {
                warn!(path = %file.display(), error = %e, "aborting snapshot");
                if let Err(abort) = snapshot.abort() {
                    warn!(error = %abort, "rollback failed");
                }
                return Err(e);
            }
        }
        snapshot.finish()
    }

    fn is_own_file(&self, path: &Path) -> bool {
        if self.own_files.is_empty() {
            return false;
        }
        // Unresolvable paths are kept so that adding them reports the error.
        fs::canonicalize(path).is_ok_and(|path| self.own_files.contains(&path))
    }

    /// Writes the bytes of `revision` to `out` and returns how many were
    /// written.
    pub fn restore<W: Write + ?Sized>(&self, revision: RevisionId, out: &mut W) -> Result<u64> {
        let catalog = self.catalog();
        let info = catalog.revision(revision)?;
        restore_content(
            &catalog,
            info.content,
            &info.content_hash,
            self.config.verify_restore(),
            out,
        )
    }

    /// Restores `revision` into a file at `dest`, replacing its contents.
    pub fn restore_to_path(&self, revision: RevisionId, dest: impl AsRef<Path>) -> Result<u64> {
        let mut out = BufWriter::new(File::create(dest)?);
        let written = self.restore(revision, &mut out)?;
        out.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        Ok(written)
    }

    /// Looks up one revision.
    pub fn revision(&self, id: RevisionId) -> Result<RevisionInfo> {
        self.catalog().revision(id)
    }

    /// The most recent revision of `path`.
    pub fn latest_revision(&self, path: &str) -> Result<RevisionInfo> {
        self.catalog()
            .latest_revision(path)?
            .ok_or_else(|| Error::not_found("file", path))
    }

    /// Every revision of `path`, oldest first.
    pub fn history(&self, path: &str) -> Result<Vec<RevisionInfo>> {
        self.catalog().history(path)
    }

    /// All committed snapshots, oldest first.
    pub fn snapshots(&self) -> Result<Vec<SnapshotInfo>> {
        self.catalog().snapshots()
    }

    /// Revisions of one snapshot.
    pub fn revisions_in(&self, snapshot: SnapshotId) -> Result<Vec<RevisionInfo>> {
        self.catalog().revisions_in(snapshot)
    }

    /// Segments of one content.
    pub fn segments(&self, content: ContentId) -> Result<Vec<SegmentInfo>> {
        self.catalog().segments(content)
    }

    /// Row counts and stored bytes.
    pub fn stats(&self) -> Result<RepositoryStats> {
        self.catalog().stats()
    }
}

fn database_files(db: &Path) -> Vec<PathBuf> {
    let mut files = vec![db.to_path_buf()];
    for suffix in ["-journal", "-wal", "-shm"] {
        let mut name = OsString::from(db.as_os_str());
        name.push(suffix);
        files.push(PathBuf::from(name));
    }
    files
}

fn single_revision(summary: SnapshotSummary) -> Result<RevisionId> {
    summary
        .revisions
        .first()
        .map(|r| r.revision)
        .ok_or_else(|| Error::msg("snapshot committed without a revision"))
}
