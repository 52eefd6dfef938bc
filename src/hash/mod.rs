//! Content hashing.
//!
//! The same BLAKE3 digest identifies a single chunk and a whole file. File
//! digests are computed by streaming, so a file never has to fit in memory.
//!
//! - [`Blake3Hasher`] - Incremental BLAKE3 hasher producing [`Digest`](crate::Digest)
//! - [`hash_reader`] - Digest of everything a reader yields

mod blake3;

pub use self::blake3::{Blake3Hasher, hash_reader};
