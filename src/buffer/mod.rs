//! Internal working buffer for the chunker.
//!
//! The chunker scans a fixed-capacity buffer for one boundary at a time.
//! Bytes read past a boundary stay in the buffer for the next scan. It is an
//! implementation detail and not part of the public API.

mod work;

pub(crate) use work::WorkBuffer;
