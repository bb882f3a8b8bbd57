//! A benchmark for the bit primitives and the cursors.

use blockrle::bitword::{get_bit, get_byte, put_bit, put_byte, Block};
use blockrle::blockstream::BlockStream;
use blockrle::cursor::{PackCursor, UnpackCursor};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;

fn test_put_get_bit() {
    let mut word: Block = 0;
    for i in 0..1_000_000u32 {
        word = put_bit(word, (i & 1) as u8, i % 64);
        black_box(get_bit(word, (i * 7) % 64));
    }
    black_box(word);
}

fn test_put_get_byte() {
    let mut word: Block = 0;
    for i in 0..1_000_000u32 {
        word = put_byte(word, i as u8, i % 57);
        black_box(get_byte(word, (i * 3) % 57));
    }
    black_box(word);
}

fn test_pack_unpack_n_bits() {
    let mut stream = BlockStream::new(Cursor::new(vec![]), Vec::new(), 2048);
    let mut cursor = PackCursor::new();
    for i in 0..1_000_000u32 {
        let _ = cursor.put_word(&mut stream, i as u8, 1 + i % 8);
    }
    let _ = cursor.finish(&mut stream);
    let packed = stream.close().unwrap();

    let mut stream = BlockStream::new(Cursor::new(packed), Vec::new(), 2048);
    let mut cursor = UnpackCursor::new();
    for i in 0..1_000_000u32 {
        black_box(cursor.get_word(&mut stream, 1 + i % 8).unwrap());
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("put/get bit", |b| b.iter(test_put_get_bit));
    c.bench_function("put/get byte", |b| b.iter(test_put_get_byte));
    c.bench_function("pack/unpack n bits", |b| {
        b.iter(test_pack_unpack_n_bits)
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
