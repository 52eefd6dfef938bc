//! Benchmarks for chunkvault.
//!
//! Run with:
//!     cargo bench

use std::io::Cursor;

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use chunkvault::cdc::{RollingWindow, WINDOW_SIZE, window_hash};
use chunkvault::{ChunkConfig, Chunker, HashConfig, Repository, RepositoryConfig};

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

fn bench_chunker(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunker");

    for size in [64 * 1024, 1024 * 1024, 10 * 1024 * 1024] {
        let data = lcg_bytes(42, size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(format!("random_{}kb", size / 1024), &data, |b, data| {
            b.iter(|| {
                let chunker = Chunker::default();
                black_box(chunker.chunk_bytes(black_box(data.clone())).unwrap().len())
            });
        });

        // Never cuts on content, only on capacity.
        let zeros = vec![0u8; size];
        group.bench_with_input(format!("zeros_{}kb", size / 1024), &zeros, |b, data| {
            b.iter(|| {
                let chunker = Chunker::default();
                black_box(chunker.chunk_bytes(black_box(data.clone())).unwrap().len())
            });
        });
    }

    group.finish();
}

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("window");
    let data = lcg_bytes(7, 64 * 1024);
    group.throughput(Throughput::Bytes((data.len() - WINDOW_SIZE) as u64));

    group.bench_function("rolling", |b| {
        b.iter(|| {
            let mut initial = [0u8; WINDOW_SIZE];
            initial.copy_from_slice(&data[..WINDOW_SIZE]);
            let mut window = RollingWindow::new(&initial);
            let mut cuts = 0usize;
            for &byte in &data[WINDOW_SIZE..] {
                window.roll(byte);
                cuts += window.is_boundary() as usize;
            }
            black_box(cuts)
        });
    });

    group.bench_function("reference", |b| {
        b.iter(|| {
            let mut acc = 0u64;
            for window in data.windows(WINDOW_SIZE) {
                let mut fixed = [0u8; WINDOW_SIZE];
                fixed.copy_from_slice(window);
                acc ^= window_hash(&fixed);
            }
            black_box(acc)
        });
    });

    group.finish();
}

fn bench_configs(c: &mut Criterion) {
    let mut group = c.benchmark_group("configs");
    let size = 1024 * 1024;
    let data = lcg_bytes(3, size);
    group.throughput(Throughput::Bytes(size as u64));

    for capacity in [1024, 8000, 64 * 1024] {
        let config = ChunkConfig::new(capacity).unwrap();
        group.bench_function(format!("capacity_{capacity}"), |b| {
            b.iter(|| {
                let chunker = Chunker::new(config);
                black_box(chunker.chunk_bytes(black_box(data.clone())).unwrap().len())
            });
        });
    }

    group.bench_function("no_hash", |b| {
        let config = ChunkConfig::default().with_hash_config(HashConfig::disabled());
        b.iter(|| {
            let chunker = Chunker::new(config);
            black_box(chunker.chunk_bytes(black_box(data.clone())).unwrap().len())
        });
    });

    group.finish();
}

fn bench_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");
    let size = 1024 * 1024;
    let data = lcg_bytes(11, size);
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_function("iterator", |b| {
        b.iter(|| {
            let chunker = Chunker::default();
            let mut count = 0;
            for chunk in chunker.chunk(Cursor::new(black_box(&data))) {
                black_box(chunk.unwrap());
                count += 1;
            }
            black_box(count)
        });
    });

    group.bench_function("ingest_in_memory", |b| {
        b.iter(|| {
            let mut repo = Repository::open_in_memory(RepositoryConfig::default()).unwrap();
            let revision = repo
                .ingest_reader("bench.bin", &mut Cursor::new(black_box(&data)))
                .unwrap();
            black_box(revision)
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_chunker,
    bench_window,
    bench_configs,
    bench_streaming
);
criterion_main!(benches);
