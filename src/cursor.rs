//! Cursors that track a bit position inside the block that is currently being
//! assembled or consumed. The compressor fills blocks from the most significant
//! bit down, and the decompressor consumes them in the same order, so each
//! direction gets its own cursor type with its own bookkeeping.

use std::io::{Read, Write};

use crate::bitword::{get_bit, get_byte, put_bit, put_byte, Block, BLOCK_BITS};
use crate::blockstream::BlockStream;
use crate::errors::IoError;

/// Packs bits into output blocks, starting at the most significant bit.
#[derive(Debug)]
pub struct PackCursor {
    block: Block,
    /// The number of free bits in 'block'. Counts down from BLOCK_BITS. The
    /// next bit goes to offset 'pos - 1'.
    pos: u32,
}

impl Default for PackCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PackCursor {
    pub fn new() -> Self {
        Self {
            block: 0,
            pos: BLOCK_BITS,
        }
    }

    /// Returns the number of free bits in the current block.
    #[must_use]
    pub fn free_bits(&self) -> u32 {
        self.pos
    }

    /// Hand the full block to the stream and start a new one.
    fn flush<R: Read, W: Write>(
        &mut self,
        stream: &mut BlockStream<R, W>,
    ) -> Result<(), IoError> {
        stream.put_block(self.block)?;
        self.block = 0;
        self.pos = BLOCK_BITS;
        Ok(())
    }

    pub fn put_bit<R: Read, W: Write>(
        &mut self,
        stream: &mut BlockStream<R, W>,
        bit: u8,
    ) -> Result<(), IoError> {
        if self.pos == 0 {
            self.flush(stream)?;
        }
        self.pos -= 1;
        self.block = put_bit(self.block, bit, self.pos);
        Ok(())
    }

    /// Push the lowest 'len' bits of 'word', most significant bit first.
    pub fn put_word<R: Read, W: Write>(
        &mut self,
        stream: &mut BlockStream<R, W>,
        word: u8,
        len: u32,
    ) -> Result<(), IoError> {
        debug_assert!(len <= 8, "Pushing too many bits");
        // Whole bytes that fit in the block are written in one step.
        if len == 8 && self.pos >= 8 {
            self.pos -= 8;
            self.block = put_byte(self.block, word, self.pos);
            return Ok(());
        }
        for i in (0..len).rev() {
            self.put_bit(stream, get_bit(word as Block, i))?;
        }
        Ok(())
    }

    /// Hand the partially filled block to the stream, if it holds any bits.
    pub fn finish<R: Read, W: Write>(
        mut self,
        stream: &mut BlockStream<R, W>,
    ) -> Result<(), IoError> {
        if self.pos < BLOCK_BITS {
            self.flush(stream)?;
        }
        Ok(())
    }
}

/// Consumes bits from input blocks in the order that 'PackCursor' wrote them.
#[derive(Debug)]
pub struct UnpackCursor {
    block: Block,
    /// The number of bits consumed from 'block'. Counts up to BLOCK_BITS. The
    /// next bit is at offset 'BLOCK_BITS - 1 - pos'.
    pos: u32,
    /// Set once the input is exhausted. From then on the cursor produces
    /// zero bits, which stand for the zero bytes that the stream trimmed.
    padding: bool,
}

impl Default for UnpackCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl UnpackCursor {
    pub fn new() -> Self {
        Self {
            block: 0,
            pos: BLOCK_BITS,
            padding: false,
        }
    }

    /// Returns true if the cursor ran past the end of the input.
    #[must_use]
    pub fn is_padding(&self) -> bool {
        self.padding
    }

    /// Make sure that the current block has bits to read. Returns false at
    /// the end of the input.
    fn refill<R: Read, W: Write>(
        &mut self,
        stream: &mut BlockStream<R, W>,
    ) -> Result<bool, IoError> {
        if self.pos < BLOCK_BITS {
            return Ok(true);
        }
        if self.padding {
            return Ok(false);
        }
        match stream.get_block() {
            Ok(block) => {
                self.block = block;
                self.pos = 0;
                Ok(true)
            }
            Err(IoError::Eof) => {
                self.padding = true;
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Returns the next bit without consuming it, or None at the end of the
    /// input.
    pub fn peek_bit<R: Read, W: Write>(
        &mut self,
        stream: &mut BlockStream<R, W>,
    ) -> Result<Option<u8>, IoError> {
        if !self.refill(stream)? {
            return Ok(None);
        }
        Ok(Some(get_bit(self.block, BLOCK_BITS - 1 - self.pos)))
    }

    pub fn get_bit<R: Read, W: Write>(
        &mut self,
        stream: &mut BlockStream<R, W>,
    ) -> Result<u8, IoError> {
        if !self.refill(stream)? {
            return Ok(0);
        }
        let bit = get_bit(self.block, BLOCK_BITS - 1 - self.pos);
        self.pos += 1;
        Ok(bit)
    }

    /// Read 'len' bits and return them in the low bits of a byte. The first
    /// bit that is read becomes the most significant one.
    pub fn get_word<R: Read, W: Write>(
        &mut self,
        stream: &mut BlockStream<R, W>,
        len: u32,
    ) -> Result<u8, IoError> {
        debug_assert!(len <= 8, "Taking too many bits");
        if len == 8 && self.pos + 8 <= BLOCK_BITS {
            let byte = get_byte(self.block, BLOCK_BITS - 8 - self.pos);
            self.pos += 8;
            return Ok(byte);
        }
        let mut word = 0u8;
        for _ in 0..len {
            word = (word << 1) | self.get_bit(stream)?;
        }
        Ok(word)
    }
}

/// Fills output blocks one byte at a time, least significant byte first, so
/// that the bytes land on disk in the order they were pushed.
#[derive(Debug)]
pub struct ByteCursor {
    block: Block,
    /// The offset of the next byte. Counts up to BLOCK_BITS.
    pos: u32,
}

impl Default for ByteCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteCursor {
    pub fn new() -> Self {
        Self { block: 0, pos: 0 }
    }

    pub fn put_byte<R: Read, W: Write>(
        &mut self,
        stream: &mut BlockStream<R, W>,
        byte: u8,
    ) -> Result<(), IoError> {
        if self.pos == BLOCK_BITS {
            stream.put_block(self.block)?;
            self.block = 0;
            self.pos = 0;
        }
        self.block = put_byte(self.block, byte, self.pos);
        self.pos += 8;
        Ok(())
    }

    /// Hand the partially filled block to the stream, if it holds any bytes.
    pub fn finish<R: Read, W: Write>(
        self,
        stream: &mut BlockStream<R, W>,
    ) -> Result<(), IoError> {
        if self.pos > 0 {
            stream.put_block(self.block)?;
        }
        Ok(())
    }
}
