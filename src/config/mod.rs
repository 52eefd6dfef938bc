//! Configuration for chunking and the repository.
//!
//! - [`ChunkConfig`] - Working-buffer capacity and chunk hashing
//! - [`HashConfig`] - Hash computation control
//! - [`RepositoryConfig`] - Chunking, lock timeout and restore verification

use std::time::Duration;

use crate::cdc::WINDOW_SIZE;
use crate::error::{Error, Result};

/// Default working-buffer capacity, and therefore the maximum chunk size.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8000;

/// Default bound on waiting for the database lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// Configuration for content-defined chunking.
///
/// The chunker never emits a chunk longer than `buffer_capacity`: when no
/// boundary is found inside a full buffer the chunk is cut unconditionally.
/// Changing the capacity changes chunk boundaries, so a repository must keep
/// using the value it was populated with for deduplication to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkConfig {
    buffer_capacity: usize,
    hash_config: HashConfig,
}

impl ChunkConfig {
    /// Creates a new configuration.
    ///
    /// Returns error if the capacity cannot hold more than one window.
    pub fn new(buffer_capacity: usize) -> Result<Self> {
        if buffer_capacity <= WINDOW_SIZE {
            return Err(Error::InvalidConfig {
                message: "buffer capacity must exceed the 64-byte window",
            });
        }

        Ok(Self {
            buffer_capacity,
            hash_config: HashConfig::default(),
        })
    }

    /// Sets the working-buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Sets the hash configuration.
    pub fn with_hash_config(mut self, config: HashConfig) -> Self {
        self.hash_config = config;
        self
    }

    /// Returns the working-buffer capacity.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Returns the hash configuration.
    pub fn hash_config(&self) -> &HashConfig {
        &self.hash_config
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.buffer_capacity).map(|_| ())
    }
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            hash_config: HashConfig::default(),
        }
    }
}

/// Configuration for chunk hashing.
///
/// Controls whether BLAKE3 digests are attached to each emitted chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashConfig {
    /// Whether to compute BLAKE3 hashes.
    pub enabled: bool,
}

impl HashConfig {
    /// Creates a new hash configuration.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enables hashing.
    pub const fn enabled() -> Self {
        Self { enabled: true }
    }

    /// Disables hashing.
    pub const fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for HashConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Configuration for a [`Repository`](crate::Repository).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use chunkvault::{ChunkConfig, RepositoryConfig};
///
/// let config = RepositoryConfig::default()
///     .with_chunk_config(ChunkConfig::new(4096)?)
///     .with_busy_timeout(Duration::from_secs(1))
///     .with_verify_restore(false);
/// config.validate()?;
/// # Ok::<(), chunkvault::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryConfig {
    chunk_config: ChunkConfig,
    busy_timeout: Duration,
    verify_restore: bool,
}

impl RepositoryConfig {
    /// Sets the chunking configuration used for ingestion.
    pub fn with_chunk_config(mut self, config: ChunkConfig) -> Self {
        self.chunk_config = config;
        self
    }

    /// Sets how long a writer waits for the database lock before failing.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether restore re-hashes the written bytes against the content digest.
    pub fn with_verify_restore(mut self, verify: bool) -> Self {
        self.verify_restore = verify;
        self
    }

    /// Returns the chunking configuration.
    pub fn chunk_config(&self) -> &ChunkConfig {
        &self.chunk_config
    }

    /// Returns the lock acquisition timeout.
    pub fn busy_timeout(&self) -> Duration {
        self.busy_timeout
    }

    /// Returns whether restores are verified.
    pub fn verify_restore(&self) -> bool {
        self.verify_restore
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<()> {
        self.chunk_config.validate()
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            chunk_config: ChunkConfig::default(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            verify_restore: true,
        }
    }
}
