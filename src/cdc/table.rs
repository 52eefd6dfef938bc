//! Byte-hash table for the window hash.

const SEED: u64 = 0xfbe8_a26b_6c81_741e;
const MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const INCREMENT: u64 = 1_442_695_040_888_963_407;

/// Generates the table with the linear recurrence
/// `t[0] = SEED`, `t[i] = t[i - 1] * MULTIPLIER + INCREMENT` (mod 2^64).
const fn byte_hash_values() -> [u64; 256] {
    let mut table = [0u64; 256];
    table[0] = SEED;
    let mut i = 1;
    while i < 256 {
        table[i] = table[i - 1].wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        i += 1;
    }
    table
}

/// Pseudo-random 64-bit value for every byte value.
///
/// Must never change: chunk boundaries, and with them every stored chunk
/// digest, are derived from it.
pub static BYTE_HASHES: [u64; 256] = byte_hash_values();
