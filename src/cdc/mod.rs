//! Content-defined boundary detection.
//!
//! A boundary is cut wherever the hash of the most recent [`WINDOW_SIZE`]
//! bytes falls below [`BOUNDARY_THRESHOLD`]. The window hash XORs each
//! byte's [`BYTE_HASHES`] entry rotated left by its position in the window
//! (0 = oldest), so it depends only on the window contents and the fixed
//! table. Boundaries therefore reproduce across runs and machines.
//!
//! - [`window_hash`] - Reference O(64) window hash
//! - [`RollingWindow`] - Incremental O(1) form over a ring buffer
//! - [`find_boundary`] - Boundary scan over one working buffer

mod table;
mod window;

pub use table::BYTE_HASHES;
pub use window::{RollingWindow, find_boundary, window_hash};

/// Number of bytes covered by the window hash.
pub const WINDOW_SIZE: usize = 64;

/// A window hash below this value marks a boundary (probability ~1/300).
pub const BOUNDARY_THRESHOLD: u64 = u64::MAX / 300;
