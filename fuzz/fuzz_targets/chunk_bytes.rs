#![no_main]

use libfuzzer_sys::fuzz_target;
use chunkvault::{ChunkConfig, Chunker};

fuzz_target!(|data: Vec<u8>| {
    for capacity in [65, 256, 8000] {
        let config = ChunkConfig::new(capacity).unwrap();
        let chunks = Chunker::new(config).chunk_bytes(data.clone()).unwrap();

        // Never longer than the working buffer, never empty.
        for chunk in &chunks {
            assert!(chunk.len() <= capacity);
            assert!(!chunk.is_empty());
        }

        // Contiguous, dense, and covering the whole input.
        let mut offset = 0u64;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence as usize, i);
            assert_eq!(chunk.offset, offset);
            assert_eq!(&data[chunk.range().start as usize..chunk.end() as usize], &chunk.data[..]);
            offset = chunk.end();
        }
        assert_eq!(offset, data.len() as u64);

        // Same input, same chunks.
        assert_eq!(Chunker::new(config).chunk_bytes(data.clone()).unwrap(), chunks);
    }
});
