// Integration tests for the Chunker API
// Tests cover: coverage, determinism, capacity bound, locality of edits

use std::collections::HashSet;
use std::io::{Cursor, Read};

use bytes::Bytes;
use chunkvault::cdc::{RollingWindow, WINDOW_SIZE, find_boundary, window_hash};
use chunkvault::{ChunkConfig, Chunker, Digest, Error, HashConfig};
use proptest::prelude::*;

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

fn lengths(data: &[u8]) -> Vec<usize> {
    Chunker::default()
        .chunk_bytes(data.to_vec())
        .unwrap()
        .iter()
        .map(|c| c.len())
        .collect()
}

fn digests(data: &[u8]) -> Vec<Digest> {
    Chunker::default()
        .chunk_bytes(data.to_vec())
        .unwrap()
        .iter()
        .map(|c| c.digest())
        .collect()
}

/// Hands out at most `step` bytes per read.
struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.step).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

// ============================================================================
// Basic Functionality
// ============================================================================

#[test]
fn test_empty_input() {
    let chunker = Chunker::default();
    assert!(chunker.chunk_bytes(Bytes::new()).unwrap().is_empty());
    assert!(chunker.chunk(Cursor::new(Vec::new())).next().is_none());
}

#[test]
fn test_window_sized_inputs_are_single_chunks() {
    assert_eq!(lengths(&lcg_bytes(3, 64)), vec![64]);
    assert_eq!(lengths(&lcg_bytes(3, 65)), vec![65]);
    assert_eq!(lengths(&[0u8; 1]), vec![1]);
}

#[test]
fn test_zero_file_two_chunks() {
    let data = vec![0u8; 10 * 1024];
    assert_eq!(lengths(&data), vec![8000, 2240]);

    let distinct: HashSet<_> = digests(&data).into_iter().collect();
    assert_eq!(distinct.len(), 2);
}

// ============================================================================
// Pinned Boundaries
// ============================================================================

#[test]
fn test_pinned_pseudo_random_stream() {
    let data = lcg_bytes(42, 20_000);
    let lens = lengths(&data);

    assert_eq!(lens.len(), 49);
    assert_eq!(
        &lens[..12],
        &[74, 715, 197, 333, 247, 2002, 167, 312, 769, 953, 316, 104]
    );
    assert_eq!(lens[..lens.len() - 1].iter().max(), Some(&2002));
    assert_eq!(find_boundary(&data[..8000]), 74);
}

#[test]
fn test_pinned_short_stream() {
    assert_eq!(
        lengths(&lcg_bytes(7, 2_000)),
        vec![208, 320, 372, 402, 138, 314, 231, 15]
    );
}

#[test]
fn test_pinned_small_capacity() {
    let config = ChunkConfig::new(256).unwrap();
    let chunks = Chunker::new(config).chunk_bytes(lcg_bytes(42, 20_000)).unwrap();
    let lens: Vec<_> = chunks.iter().map(|c| c.len()).collect();

    assert_eq!(lens.len(), 94);
    assert!(lens.iter().all(|&l| l <= 256));
    assert_eq!(&lens[..6], &[74, 256, 256, 203, 197, 256]);
}

#[test]
fn test_capacity_within_window_is_rejected_on_every_path() {
    let chunker = Chunker::new(ChunkConfig::default().with_buffer_capacity(0));
    let data = lcg_bytes(42, 2_000);

    assert!(matches!(
        chunker.chunk_bytes(data.clone()),
        Err(Error::InvalidConfig { .. })
    ));

    let results: Vec<_> = chunker.chunk(Cursor::new(&data)).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(Error::InvalidConfig { .. })));
}

// ============================================================================
// Locality of Edits
// ============================================================================

#[test]
fn test_byte_flip_changes_few_chunks() {
    let original = lcg_bytes(42, 20_000);
    let mut edited = original.clone();
    edited[100] ^= 0xFF;

    let before: HashSet<_> = digests(&original).into_iter().collect();
    let after = digests(&edited);
    let fresh = after.iter().filter(|d| !before.contains(d)).count();

    assert_eq!(after.len(), 50);
    assert_eq!(fresh, 2);
}

#[test]
fn test_insertion_changes_one_chunk() {
    let original = lcg_bytes(42, 20_000);
    let mut edited = original[..5000].to_vec();
    edited.extend_from_slice(b"hello");
    edited.extend_from_slice(&original[5000..]);

    let before: HashSet<_> = digests(&original).into_iter().collect();
    let after = digests(&edited);
    let fresh = after.iter().filter(|d| !before.contains(d)).count();

    assert_eq!(after.len(), 49);
    assert_eq!(fresh, 1);
}

#[test]
fn test_shared_tail_resynchronizes() {
    let tail = lcg_bytes(99, 8000);
    let mut a = lcg_bytes(1, 3000);
    a.extend_from_slice(&tail);
    let mut b = lcg_bytes(2, 5000);
    b.extend_from_slice(&tail);

    let known: HashSet<_> = digests(&a).into_iter().collect();
    let b_digests = digests(&b);
    let shared = b_digests.iter().filter(|d| known.contains(d)).count();

    assert_eq!(b_digests.len(), 31);
    assert_eq!(shared, 18);
}

// ============================================================================
// Readers
// ============================================================================

#[test]
fn test_short_reads_do_not_move_boundaries() {
    let data = lcg_bytes(11, 40_000);
    let expected = Chunker::default().chunk_bytes(data.clone()).unwrap();

    for step in [1, 7, 63, 4096] {
        let reader = Trickle { data: &data, step };
        let got: Vec<_> = Chunker::default()
            .chunk(reader)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(got, expected, "step {step}");
    }
}

#[test]
fn test_hashing_can_be_disabled() {
    let config = ChunkConfig::default().with_hash_config(HashConfig::disabled());
    let chunks = Chunker::new(config).chunk_bytes(lcg_bytes(5, 3000)).unwrap();
    assert!(chunks.iter().all(|c| c.hash.is_none()));
    assert!(chunks.iter().all(|c| c.digest() == Digest::of(&c.data)));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn chunks_cover_input(data in prop::collection::vec(any::<u8>(), 0..30_000)) {
        let chunks = Chunker::default().chunk_bytes(data.clone()).unwrap();
        let mut offset = 0u64;
        let mut joined = Vec::with_capacity(data.len());
        for (i, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.sequence as usize, i);
            prop_assert_eq!(chunk.offset, offset);
            prop_assert!(!chunk.is_empty());
            offset += chunk.len() as u64;
            joined.extend_from_slice(&chunk.data);
        }
        prop_assert_eq!(joined, data);
    }

    #[test]
    fn chunks_respect_capacity(
        data in prop::collection::vec(any::<u8>(), 0..5_000),
        capacity in 65usize..1024,
    ) {
        let config = ChunkConfig::new(capacity).unwrap();
        for chunk in Chunker::new(config).chunk_bytes(data).unwrap() {
            prop_assert!(chunk.len() <= capacity);
        }
    }

    #[test]
    fn chunking_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..20_000)) {
        let first = Chunker::default().chunk_bytes(data.clone()).unwrap();
        let second: Vec<_> = Chunker::default()
            .chunk(Cursor::new(data))
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rolling_hash_matches_reference(data in prop::collection::vec(any::<u8>(), 64..600)) {
        let mut initial = [0u8; WINDOW_SIZE];
        initial.copy_from_slice(&data[..WINDOW_SIZE]);
        let mut window = RollingWindow::new(&initial);

        for end in WINDOW_SIZE..data.len() {
            window.roll(data[end]);
            let mut expected = [0u8; WINDOW_SIZE];
            expected.copy_from_slice(&data[end + 1 - WINDOW_SIZE..=end]);
            prop_assert_eq!(window.hash(), window_hash(&expected));
        }
    }
}
