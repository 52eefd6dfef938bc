//! Typed row identifiers and SQL codecs.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::chunk::Digest;
use crate::error::Error;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row id.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw row id.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| Error::msg(format!("invalid {} id: {s:?}", $what)))
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.0))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                i64::column_result(value).map(Self)
            }
        }
    };
}

row_id!(
    /// Identifier of a stored chunk.
    ChunkId,
    "chunk"
);
row_id!(
    /// Identifier of a distinct whole-file content.
    ContentId,
    "content"
);
row_id!(
    /// Identifier of a logical file path.
    FileId,
    "file"
);
row_id!(
    /// Identifier of a snapshot.
    SnapshotId,
    "snapshot"
);
row_id!(
    /// Identifier of a committed revision.
    RevisionId,
    "revision"
);

impl ToSql for Digest {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Borrowed(ValueRef::Blob(self.as_bytes())))
    }
}

impl FromSql for Digest {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let blob = value.as_blob()?;
        Digest::from_slice(blob).ok_or(FromSqlError::InvalidBlobSize {
            expected_size: Digest::SIZE,
            blob_size: blob.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_parse_and_display() {
        let id: RevisionId = " 17 ".parse().unwrap();
        assert_eq!(id, RevisionId::new(17));
        assert_eq!(id.to_string(), "17");
        assert!("seventeen".parse::<RevisionId>().is_err());
    }

    #[test]
    fn test_sql_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        let digest = Digest::of(b"payload");
        let (id, back): (ChunkId, Digest) = conn
            .query_row("SELECT ?1, ?2", rusqlite::params![ChunkId::new(5), digest], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(id, ChunkId::new(5));
        assert_eq!(back, digest);
    }

    #[test]
    fn test_short_blob_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let res: rusqlite::Result<Digest> =
            conn.query_row("SELECT x'0102'", [], |row| row.get(0));
        assert!(res.is_err());
    }
}
