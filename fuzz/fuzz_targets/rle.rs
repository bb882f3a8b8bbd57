#![no_main]

use blockrle::{compress, decompress, BlockStream, Context};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Only 7-bit text without zeros can be encoded.
    let text: Vec<u8> = data.iter().map(|b| (b & 0x7f).max(1)).collect();
    let rep_bits = 2 + data.first().map_or(1, |b| b % 6);
    let ctx = Context::new(rep_bits, 1);

    let mut stream =
        BlockStream::new(Cursor::new(text.clone()), Vec::new(), 1);
    let read = compress(&mut stream, ctx).unwrap();
    assert_eq!(read, text.len() as u64);
    let compressed = stream.close().unwrap();

    let mut stream =
        BlockStream::new(Cursor::new(compressed), Vec::new(), 1);
    let written = decompress(&mut stream, ctx).unwrap();
    let decompressed = stream.close().unwrap();
    assert_eq!(written, decompressed.len() as u64);
    assert_eq!(decompressed, text);
});
