#![no_main]

use blockrle::{decompress, BlockStream, Context};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let mut stream =
        BlockStream::new(Cursor::new(data.to_vec()), Vec::new(), 1);
    let _ = decompress(&mut stream, Context::default());
});
