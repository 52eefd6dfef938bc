//! Database schema and connection setup.

use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use crate::error::{DbContext, Result};

/// Tables, created idempotently. Chunk and content rows are keyed by digest;
/// a content's segments are keyed by `(content_id, sequence)`, which rules
/// out duplicate sequence numbers.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS chunk (
    chunk_id INTEGER PRIMARY KEY AUTOINCREMENT,
    hash BLOB NOT NULL UNIQUE,
    contents BLOB NOT NULL
);

CREATE TABLE IF NOT EXISTS file (
    file_id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS content (
    content_id INTEGER PRIMARY KEY AUTOINCREMENT,
    hash BLOB NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS segment (
    content_id INTEGER NOT NULL REFERENCES content(content_id),
    sequence INTEGER NOT NULL,
    chunk_id INTEGER NOT NULL REFERENCES chunk(chunk_id),
    PRIMARY KEY (content_id, sequence)
);

CREATE TABLE IF NOT EXISTS snapshot (
    snapshot_id INTEGER PRIMARY KEY AUTOINCREMENT,
    time TEXT NOT NULL,
    note TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS revision (
    revision_id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id INTEGER NOT NULL REFERENCES file(file_id),
    snapshot_id INTEGER NOT NULL REFERENCES snapshot(snapshot_id),
    content_id INTEGER NOT NULL REFERENCES content(content_id),
    UNIQUE (file_id, snapshot_id)
);

CREATE INDEX IF NOT EXISTS idx_revision_snapshot ON revision(snapshot_id);
";

/// Configures the connection and creates any missing tables.
pub(crate) fn init(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    conn.busy_timeout(busy_timeout)
        .context("setting the lock timeout")?;
    conn.pragma_update(None, "foreign_keys", true)
        .context("enabling foreign keys")?;
    conn.execute_batch(SCHEMA).context("creating tables")?;
    debug!(?busy_timeout, "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn, Duration::from_millis(100)).unwrap();
        init(&conn, Duration::from_millis(100)).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
                 AND name IN ('chunk', 'file', 'content', 'segment', 'snapshot', 'revision')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }

    #[test]
    fn test_duplicate_sequence_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        init(&conn, Duration::from_millis(100)).unwrap();
        conn.execute_batch(
            "INSERT INTO chunk(hash, contents) VALUES (x'00', x'01');
             INSERT INTO content(hash) VALUES (x'02');
             INSERT INTO segment(content_id, sequence, chunk_id) VALUES (1, 0, 1);",
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO segment(content_id, sequence, chunk_id) VALUES (1, 0, 1)",
            [],
        );
        assert!(dup.is_err());
    }
}
