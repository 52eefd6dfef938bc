//! File, snapshot and revision rows.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};

use crate::error::{DbContext, Error, Result};

use super::{
    Catalog, ContentId, FileId, RepositoryStats, RevisionId, RevisionInfo, SnapshotId,
    SnapshotInfo,
};

const REVISION_COLUMNS: &str = "r.revision_id, f.path, r.snapshot_id, s.time, r.content_id, c.hash
     FROM revision r
     JOIN file f ON f.file_id = r.file_id
     JOIN snapshot s ON s.snapshot_id = r.snapshot_id
     JOIN content c ON c.content_id = r.content_id";

fn revision_from_row(row: &Row<'_>) -> rusqlite::Result<RevisionInfo> {
    Ok(RevisionInfo {
        id: row.get(0)?,
        path: row.get(1)?,
        snapshot: row.get(2)?,
        time: row.get(3)?,
        content: row.get(4)?,
        content_hash: row.get(5)?,
    })
}

impl Catalog<'_> {
    /// Looks up a file by path.
    pub fn find_file(&self, path: &str) -> Result<Option<FileId>> {
        let context = "looking up a file entry";
        self.conn
            .prepare_cached("SELECT file_id FROM file WHERE path = ?1")
            .context(context)?
            .query_row(params![path], |row| row.get(0))
            .optional()
            .context(context)
    }

    /// Returns the file id for `path`, creating the entry on first use.
    pub fn resolve_file(&self, path: &str) -> Result<FileId> {
        if let Some(id) = self.find_file(path)? {
            return Ok(id);
        }
        let context = "creating a file entry";
        self.conn
            .prepare_cached("INSERT INTO file(path) VALUES (?1)")
            .context(context)?
            .execute(params![path])
            .context(context)?;
        Ok(FileId::new(self.conn.last_insert_rowid()))
    }

    pub(crate) fn insert_snapshot(&self, time: DateTime<Utc>, note: &str) -> Result<SnapshotId> {
        self.conn
            .execute(
                "INSERT INTO snapshot(time, note) VALUES (?1, ?2)",
                params![time, note],
            )
            .context("opening a snapshot")?;
        Ok(SnapshotId::new(self.conn.last_insert_rowid()))
    }

    pub(crate) fn insert_revision(
        &self,
        file: FileId,
        snapshot: SnapshotId,
        content: ContentId,
    ) -> Result<RevisionId> {
        let context = "adding a revision";
        self.conn
            .prepare_cached(
                "INSERT INTO revision(file_id, snapshot_id, content_id) VALUES (?1, ?2, ?3)",
            )
            .context(context)?
            .execute(params![file, snapshot, content])
            .context(context)?;
        Ok(RevisionId::new(self.conn.last_insert_rowid()))
    }

    /// Looks up one revision.
    pub fn revision(&self, id: RevisionId) -> Result<RevisionInfo> {
        let sql = format!("SELECT {REVISION_COLUMNS} WHERE r.revision_id = ?1");
        self.conn
            .query_row(&sql, params![id], revision_from_row)
            .optional()
            .context("looking up a revision")?
            .ok_or_else(|| Error::not_found("revision", id))
    }

    /// Every revision of `path`, oldest first.
    pub fn history(&self, path: &str) -> Result<Vec<RevisionInfo>> {
        let context = "listing file history";
        let sql = format!("SELECT {REVISION_COLUMNS} WHERE f.path = ?1 ORDER BY r.revision_id ASC");
        let mut stmt = self.conn.prepare_cached(&sql).context(context)?;
        let rows = stmt
            .query_map(params![path], revision_from_row)
            .context(context)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().context(context)
    }

    /// The most recent revision of `path`, if it was ever ingested.
    pub fn latest_revision(&self, path: &str) -> Result<Option<RevisionInfo>> {
        let sql = format!(
            "SELECT {REVISION_COLUMNS} WHERE f.path = ?1 ORDER BY r.revision_id DESC LIMIT 1"
        );
        self.conn
            .query_row(&sql, params![path], revision_from_row)
            .optional()
            .context("looking up the latest revision")
    }

    /// Revisions recorded in one snapshot, in insertion order.
    pub fn revisions_in(&self, snapshot: SnapshotId) -> Result<Vec<RevisionInfo>> {
        let context = "listing snapshot revisions";
        let sql = format!(
            "SELECT {REVISION_COLUMNS} WHERE r.snapshot_id = ?1 ORDER BY r.revision_id ASC"
        );
        let mut stmt = self.conn.prepare_cached(&sql).context(context)?;
        let rows = stmt
            .query_map(params![snapshot], revision_from_row)
            .context(context)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().context(context)
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> Result<Vec<SnapshotInfo>> {
        let context = "listing snapshots";
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT s.snapshot_id, s.time, s.note, COUNT(r.revision_id)
                 FROM snapshot s
                 LEFT JOIN revision r ON r.snapshot_id = s.snapshot_id
                 GROUP BY s.snapshot_id
                 ORDER BY s.snapshot_id ASC",
            )
            .context(context)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(SnapshotInfo {
                    id: row.get(0)?,
                    time: row.get(1)?,
                    note: row.get(2)?,
                    revisions: row.get::<_, i64>(3)? as u64,
                })
            })
            .context(context)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().context(context)
    }

    /// Row counts across the repository.
    pub fn stats(&self) -> Result<RepositoryStats> {
        self.conn
            .query_row(
                "SELECT
                    (SELECT COUNT(*) FROM chunk),
                    (SELECT IFNULL(SUM(length(contents)), 0) FROM chunk),
                    (SELECT COUNT(*) FROM content),
                    (SELECT COUNT(*) FROM file),
                    (SELECT COUNT(*) FROM snapshot),
                    (SELECT COUNT(*) FROM revision)",
                [],
                |row| {
                    Ok(RepositoryStats {
                        chunks: row.get::<_, i64>(0)? as u64,
                        stored_bytes: row.get::<_, i64>(1)? as u64,
                        contents: row.get::<_, i64>(2)? as u64,
                        files: row.get::<_, i64>(3)? as u64,
                        snapshots: row.get::<_, i64>(4)? as u64,
                        revisions: row.get::<_, i64>(5)? as u64,
                    })
                },
            )
            .context("collecting statistics")
    }
}
