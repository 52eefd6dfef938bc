//! Chunking engine for processing byte streams.
//!
//! - [`Chunker`] - Configures chunking and drives handlers
//! - [`ChunkIter`] - Iterator that yields chunks from a [`std::io::Read`] source

mod engine;
mod iter;

pub use engine::Chunker;
pub use iter::ChunkIter;
