//! A bit-packing run length encoder for 7-bit text.
//!
//! The characters of 7-bit text have their top bit clear. Literal bytes are
//! written as-is, so they start with a zero bit. A run of repeated bytes is
//! written as a run-code: a one bit, followed by the length of the run in
//! 'rep_code_length' bits, followed by the repeated byte. Units are packed
//! back to back across block boundaries. A zero literal, or the end of the
//! input, ends the stream. A run-code of zero bytes is an error.

use std::io::{Read, Write};

use crate::bitword::get_byte;
use crate::blockstream::BlockStream;
use crate::cursor::{ByteCursor, PackCursor, UnpackCursor};
use crate::errors::{CodecError, Error, IoError};
use crate::{Context, Decoder, Encoder};

/// The number of bits in a literal.
const LITERAL_BITS: u32 = 8;

/// Returns true if 'byte' can be encoded.
fn is_supported(byte: u8) -> bool {
    byte != 0 && byte < 0x80
}

/// Tracks the run of bytes that was not written yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    /// Nothing is pending.
    Idle,
    /// 'count' copies of 'byte' are pending.
    Counting { byte: u8, count: u8 },
}

/// Compresses the input of a block stream into its output.
pub struct RleEncoder<'a, R, W> {
    stream: &'a mut BlockStream<R, W>,
    ctx: Context,
    cursor: PackCursor,
    state: RunState,
}

impl<'a, R: Read, W: Write> RleEncoder<'a, R, W> {
    fn emit_literal(&mut self, byte: u8) -> Result<(), IoError> {
        log::trace!("literal {:#04x}", byte);
        self.cursor.put_word(self.stream, byte, LITERAL_BITS)
    }

    fn emit_run(&mut self, byte: u8, count: u8) -> Result<(), IoError> {
        log::trace!("run {} x {:#04x}", count, byte);
        let len = self.ctx.rep_code_length() as u32;
        debug_assert!(count >= 2 && count <= self.ctx.rep_code_max());
        // The escape bit sits right above the count.
        let code = (1u8 << len) | count;
        self.cursor.put_word(self.stream, code, len + 1)?;
        self.cursor.put_word(self.stream, byte, LITERAL_BITS)
    }

    /// Write whatever is pending.
    fn close_run(&mut self) -> Result<(), IoError> {
        match self.state {
            RunState::Idle => Ok(()),
            RunState::Counting { byte, count: 1 } => self.emit_literal(byte),
            RunState::Counting { byte, count } => self.emit_run(byte, count),
        }
    }

    /// Feed the next input byte into the run detector.
    fn step(&mut self, byte: u8) -> Result<(), IoError> {
        self.state = match self.state {
            RunState::Idle => RunState::Counting { byte, count: 1 },
            RunState::Counting { byte: prev, count } if prev == byte => {
                let count = count + 1;
                // A run that reaches the largest count is closed right away.
                // The next byte starts over, even if it repeats.
                if count == self.ctx.rep_code_max() {
                    self.emit_run(prev, count)?;
                    RunState::Idle
                } else {
                    RunState::Counting { byte: prev, count }
                }
            }
            RunState::Counting { .. } => {
                self.close_run()?;
                RunState::Counting { byte, count: 1 }
            }
        };
        Ok(())
    }

    fn encode_impl(&mut self) -> Result<u64, CodecError> {
        let mut offset: u64 = 0;
        loop {
            let block = match self.stream.get_block() {
                Ok(block) => block,
                Err(IoError::Eof) => break,
                Err(err) => return Err(err.into()),
            };

            for i in 0..self.stream.valid_bytes() {
                let byte = get_byte(block, (i * 8) as u32);
                if !is_supported(byte) {
                    return Err(CodecError::UnsupportedByte { byte, offset });
                }
                self.step(byte)?;
                offset += 1;
            }
        }

        self.close_run()?;
        self.state = RunState::Idle;
        let cursor = std::mem::take(&mut self.cursor);
        cursor.finish(self.stream)?;
        log::debug!("Compressed {} bytes", offset);
        Ok(offset)
    }
}

impl<'a, R: Read, W: Write> Encoder<'a, R, W> for RleEncoder<'a, R, W> {
    fn new(stream: &'a mut BlockStream<R, W>, ctx: Context) -> Self {
        RleEncoder {
            stream,
            ctx,
            cursor: PackCursor::new(),
            state: RunState::Idle,
        }
    }

    fn encode(&mut self) -> Result<u64, Error> {
        self.encode_impl().map_err(Error::CompressionFailed)
    }
}

/// Decompresses the input of a block stream into its output.
pub struct RleDecoder<'a, R, W> {
    stream: &'a mut BlockStream<R, W>,
    ctx: Context,
    input: UnpackCursor,
    output: ByteCursor,
}

impl<'a, R: Read, W: Write> RleDecoder<'a, R, W> {
    fn emit(&mut self, byte: u8, count: u8) -> Result<(), IoError> {
        for _ in 0..count {
            self.output.put_byte(self.stream, byte)?;
        }
        Ok(())
    }

    /// Decode one unit. Returns the number of bytes that it expands to, or
    /// None if the stream ended.
    fn decode_unit(&mut self) -> Result<Option<u8>, CodecError> {
        let escape = match self.input.peek_bit(self.stream)? {
            Some(bit) => bit,
            None => return Ok(None),
        };

        if escape == 0 {
            let byte = self.input.get_word(self.stream, LITERAL_BITS)?;
            if byte == 0 {
                return Ok(None);
            }
            self.emit(byte, 1)?;
            return Ok(Some(1));
        }

        let escape = self.input.get_bit(self.stream)?;
        debug_assert_eq!(escape, 1);
        let len = self.ctx.rep_code_length() as u32;
        let count = self.input.get_word(self.stream, len)?;
        let byte = self.input.get_word(self.stream, LITERAL_BITS)?;

        if self.input.is_padding() && (count < 2 || byte == 0) {
            return Err(CodecError::Truncated);
        }
        if count < 2 {
            return Err(CodecError::InvalidRunLength(count));
        }
        // The encoder never repeats a zero byte.
        if byte == 0 {
            return Err(CodecError::ZeroRun(count));
        }
        self.emit(byte, count)?;
        Ok(Some(count))
    }

    fn decode_impl(&mut self) -> Result<u64, CodecError> {
        let mut written: u64 = 0;
        while let Some(count) = self.decode_unit()? {
            written += count as u64;
        }

        let output = std::mem::take(&mut self.output);
        output.finish(self.stream)?;
        log::debug!("Decompressed {} bytes", written);
        Ok(written)
    }
}

impl<'a, R: Read, W: Write> Decoder<'a, R, W> for RleDecoder<'a, R, W> {
    fn new(stream: &'a mut BlockStream<R, W>, ctx: Context) -> Self {
        RleDecoder {
            stream,
            ctx,
            input: UnpackCursor::new(),
            output: ByteCursor::new(),
        }
    }

    fn decode(&mut self) -> Result<u64, Error> {
        self.decode_impl().map_err(Error::DecompressionFailed)
    }
}
