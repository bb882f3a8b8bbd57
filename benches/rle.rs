//! Benchmark for the run length codec.

fn get_large_text(items: usize) -> Vec<u8> {
    let mut input = Vec::new();
    let mut v = 0usize;
    for i in 0..items {
        v += 3;
        // Mix short runs into printable text.
        let ch = b' ' + ((i ^ v) % 95) as u8;
        input.push(if i % 5 < 2 { b'-' } else { ch });
    }
    input
}

fn compress_buffer(input: &[u8]) -> Vec<u8> {
    let ctx = Context::default();
    let mut stream =
        BlockStream::new(Cursor::new(input.to_vec()), Vec::new(), 2048);
    black_box(compress(&mut stream, ctx).unwrap());
    stream.close().unwrap()
}

fn compress_large_buffer() {
    let input = get_large_text(1_000_000);
    black_box(compress_buffer(&input));
}

fn round_trip_large_buffer() {
    let input = get_large_text(1_000_000);
    let compressed = compress_buffer(&input);
    let mut stream =
        BlockStream::new(Cursor::new(compressed), Vec::new(), 2048);
    black_box(decompress(&mut stream, Context::default()).unwrap());
    black_box(stream.close().unwrap());
}

use blockrle::{compress, decompress, BlockStream, Context};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("compress_large_buffer", |b| {
        b.iter(compress_large_buffer)
    });
    c.bench_function("round_trip_large_buffer", |b| {
        b.iter(round_trip_large_buffer)
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
