//! Window hash, its rolling form, and the boundary scan.

use super::{BOUNDARY_THRESHOLD, BYTE_HASHES, WINDOW_SIZE};

/// Computes the window hash directly, oldest byte first.
///
/// Byte `i` contributes `BYTE_HASHES[byte].rotate_left(i)`.
pub fn window_hash(window: &[u8; WINDOW_SIZE]) -> u64 {
    window
        .iter()
        .enumerate()
        .fold(0u64, |hash, (i, &byte)| {
            hash ^ BYTE_HASHES[byte as usize].rotate_left(i as u32)
        })
}

/// The last [`WINDOW_SIZE`] bytes of a stream and their window hash.
///
/// Sliding by one byte costs O(1): every surviving byte moves one position
/// closer to the oldest end, which is a right rotation of the accumulated
/// value once the outgoing byte's term (at rotation 0) is removed.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    ring: [u8; WINDOW_SIZE],
    oldest: usize,
    hash: u64,
}

impl RollingWindow {
    /// Starts a window over exactly `WINDOW_SIZE` bytes.
    pub fn new(initial: &[u8; WINDOW_SIZE]) -> Self {
        Self {
            ring: *initial,
            oldest: 0,
            hash: window_hash(initial),
        }
    }

    /// Current window hash.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// True when the current window ends on a chunk boundary.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.hash < BOUNDARY_THRESHOLD
    }

    /// Drops the oldest byte, appends `incoming`, and returns the dropped byte.
    #[inline]
    pub fn roll(&mut self, incoming: u8) -> u8 {
        let outgoing = self.ring[self.oldest];
        self.ring[self.oldest] = incoming;
        self.oldest = (self.oldest + 1) % WINDOW_SIZE;

        self.hash = (self.hash ^ BYTE_HASHES[outgoing as usize]).rotate_right(1)
            ^ BYTE_HASHES[incoming as usize].rotate_left(WINDOW_SIZE as u32 - 1);
        outgoing
    }

    /// Window contents, oldest first.
    pub fn contents(&self) -> [u8; WINDOW_SIZE] {
        let mut out = [0u8; WINDOW_SIZE];
        let (tail, head) = self.ring.split_at(self.oldest);
        out[..head.len()].copy_from_slice(head);
        out[head.len()..].copy_from_slice(tail);
        out
    }
}

/// Returns the length of the chunk that starts at `data[0]`.
///
/// `data` is the filled part of the working buffer. Buffers of at most
/// [`WINDOW_SIZE`] bytes are one chunk. Otherwise the first candidate end is
/// `WINDOW_SIZE`; each candidate is tested against the window of the bytes
/// just before it, and the scan stops at `data.len()` without testing that
/// final position.
pub fn find_boundary(data: &[u8]) -> usize {
    if data.len() <= WINDOW_SIZE {
        return data.len();
    }

    let mut initial = [0u8; WINDOW_SIZE];
    initial.copy_from_slice(&data[..WINDOW_SIZE]);
    let mut window = RollingWindow::new(&initial);

    let mut end = WINDOW_SIZE;
    while end < data.len() {
        if window.is_boundary() {
            break;
        }
        window.roll(data[end]);
        end += 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcg_bytes(seed: u64, len: usize) -> Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 56) as u8
            })
            .collect()
    }

    #[test]
    fn test_uniform_zero_window_never_cuts() {
        // BYTE_HASHES[0] has odd popcount, so every bit of the XOR is set.
        let hash = window_hash(&[0u8; WINDOW_SIZE]);
        assert_eq!(hash, u64::MAX);
        assert_eq!(find_boundary(&[0u8; 8000]), 8000);
    }

    #[test]
    fn test_threshold_value() {
        assert_eq!(BOUNDARY_THRESHOLD, 61_489_146_912_365_172);
    }

    #[test]
    fn test_rolling_matches_reference() {
        let data = lcg_bytes(5, 500);
        let mut initial = [0u8; WINDOW_SIZE];
        initial.copy_from_slice(&data[..WINDOW_SIZE]);
        let mut window = RollingWindow::new(&initial);

        for end in WINDOW_SIZE..data.len() {
            let outgoing = window.roll(data[end]);
            assert_eq!(outgoing, data[end - WINDOW_SIZE]);

            let mut expected = [0u8; WINDOW_SIZE];
            expected.copy_from_slice(&data[end + 1 - WINDOW_SIZE..=end]);
            assert_eq!(window.contents(), expected);
            assert_eq!(window.hash(), window_hash(&expected), "drift at {end}");
        }
    }

    #[test]
    fn test_short_buffers_are_one_chunk() {
        assert_eq!(find_boundary(&[]), 0);
        assert_eq!(find_boundary(&[1u8; 10]), 10);
        assert_eq!(find_boundary(&[1u8; 64]), 64);
    }

    #[test]
    fn test_first_boundary_pinned() {
        assert_eq!(find_boundary(&lcg_bytes(42, 8000)), 74);
    }

    #[test]
    fn test_final_position_not_tested() {
        // With only the first 74 bytes available the boundary at 74 is the
        // final position, so the scan ends there by exhaustion instead.
        let data = lcg_bytes(42, 74);
        assert_eq!(find_boundary(&data), 74);
        let data = lcg_bytes(42, 75);
        assert_eq!(find_boundary(&data), 74);
    }
}
