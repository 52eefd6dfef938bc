//! Chunk types.
//!
//! - [`Chunk`] - Content-defined chunk with sequence, offset, data, hash
//! - [`Digest`] - 32-byte BLAKE3 digest identifying chunks and contents

mod data;
mod hash;

pub use data::Chunk;
pub use hash::Digest;
