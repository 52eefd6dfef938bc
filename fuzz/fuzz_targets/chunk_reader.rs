#![no_main]

use std::io::{Cursor, Read};

use libfuzzer_sys::fuzz_target;
use chunkvault::{ChunkConfig, Chunker};

/// Returns at most `step` bytes per read.
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

fuzz_target!(|input: (u8, Vec<u8>)| {
    let (step, data) = input;
    let step = usize::from(step).max(1);

    for capacity in [65, 1024, 8000] {
        let chunker = Chunker::new(ChunkConfig::new(capacity).unwrap());
        let expected = chunker.chunk_bytes(data.clone()).unwrap();

        let whole: Vec<_> = chunker
            .chunk(Cursor::new(&data))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(whole, expected);

        // Read sizes must not move boundaries.
        let trickled: Vec<_> = chunker
            .chunk(Trickle { data: &data, step })
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(trickled, expected);
    }
});
