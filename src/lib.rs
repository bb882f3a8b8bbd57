pub mod bitword;
pub mod blockstream;
pub mod cursor;
pub mod errors;
pub mod rle;
pub mod utils;

use std::io::{Read, Write};

pub use blockstream::BlockStream;
pub use errors::{CodecError, Error, IoError};
use rle::{RleDecoder, RleEncoder};

/// The default width of the repetition count.
pub const DEFAULT_REP_CODE_LENGTH: u8 = 3;

/// Stores the configuration of the codec.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Context {
    /// The number of bits in the repetition count of a run-code.
    rep_code_length: u8,
    /// The number of blocks in each buffer of the block stream.
    buffer_blocks: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(DEFAULT_REP_CODE_LENGTH, blockstream::DEFAULT_BUFFER_BLOCKS)
    }
}

impl Context {
    pub fn new(rep_code_length: u8, buffer_blocks: usize) -> Self {
        assert!(
            (2..=7).contains(&rep_code_length),
            "The repetition count must be 2 to 7 bits wide"
        );
        assert!(buffer_blocks > 0, "Buffers must hold at least one block");
        Self {
            rep_code_length,
            buffer_blocks,
        }
    }

    #[must_use]
    pub fn rep_code_length(&self) -> u8 {
        self.rep_code_length
    }

    /// Returns the longest run that fits in a single run-code.
    #[must_use]
    pub fn rep_code_max(&self) -> u8 {
        (1u8 << self.rep_code_length) - 1
    }

    #[must_use]
    pub fn buffer_blocks(&self) -> usize {
        self.buffer_blocks
    }
}

/// A trait that defines the interface for compressing block streams.
pub trait Encoder<'a, R, W> {
    /// Creates a new Encoder that reads from the input of 'stream' and writes
    /// into its output, with the encoder context 'ctx'.
    fn new(stream: &'a mut BlockStream<R, W>, ctx: Context) -> Self;

    /// Encode the whole input and return the number of bytes that were
    /// consumed.
    fn encode(&mut self) -> Result<u64, Error>;
}

/// A trait that defines the interface for decompressing block streams.
pub trait Decoder<'a, R, W> {
    /// Creates a new Decoder that reads from the input of 'stream' and writes
    /// into its output. 'ctx' must match the context of the encoder.
    fn new(stream: &'a mut BlockStream<R, W>, ctx: Context) -> Self;

    /// Decode the whole input and return the number of bytes that were
    /// written.
    fn decode(&mut self) -> Result<u64, Error>;
}

/// Compress the input of 'stream' into its output. Call 'BlockStream::close'
/// afterwards to write out the last block.
pub fn compress<R: Read, W: Write>(
    stream: &mut BlockStream<R, W>,
    ctx: Context,
) -> Result<u64, Error> {
    RleEncoder::new(stream, ctx).encode()
}

/// Decompress the input of 'stream' into its output. Call
/// 'BlockStream::close' afterwards to write out the last block.
pub fn decompress<R: Read, W: Write>(
    stream: &mut BlockStream<R, W>,
    ctx: Context,
) -> Result<u64, Error> {
    RleDecoder::new(stream, ctx).decode()
}
