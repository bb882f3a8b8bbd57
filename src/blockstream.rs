//! The 'BlockStream' turns an input and an output byte stream into sequences
//! of fixed-size blocks. Reads and writes go to the disk in large batches of
//! blocks, and the stream refills and flushes its buffers transparently.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::bitword::{Block, BLOCK_BYTES};
use crate::errors::IoError;

/// The default number of blocks in each buffer. Tuned empirically.
pub const DEFAULT_BUFFER_BLOCKS: usize = 2048;

/// Returns the number of bytes of 'block' that are written to disk when it is
/// the last block of the stream. The zero bytes at the top of the block are
/// dropped, and so a zero block takes no space at all.
#[must_use]
pub fn trimmed_len(block: Block) -> usize {
    BLOCK_BYTES - (block.leading_zeros() / 8) as usize
}

/// A fixed-capacity sequence of blocks with a cursor.
#[derive(Debug)]
pub struct BlockBuffer {
    /// The storage. Always holds 'capacity' blocks.
    blocks: Vec<Block>,
    /// Index of the next block to consume or produce. None until first use.
    cursor: Option<usize>,
    /// Number of blocks that hold data from the last fill (read side).
    valid_blocks: usize,
    /// Number of bytes obtained by the last fill (read side).
    valid_bytes: usize,
}

impl BlockBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "A buffer must hold at least one block");
        Self {
            blocks: vec![0; capacity],
            cursor: None,
            valid_blocks: 0,
            valid_bytes: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of blocks that were produced since the last reset.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.cursor.unwrap_or(0)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cursor == Some(self.capacity())
    }

    /// Forget the content of the buffer and unset the cursor.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.valid_blocks = 0;
        self.valid_bytes = 0;
    }

    /// Load the buffer from 'bytes', least significant byte first. The blocks
    /// past the end of 'bytes' are zero padded.
    fn load(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= self.capacity() * BLOCK_BYTES);
        let mut chunks = bytes.chunks(BLOCK_BYTES);
        for block in self.blocks.iter_mut() {
            let mut raw = [0u8; BLOCK_BYTES];
            if let Some(chunk) = chunks.next() {
                raw[..chunk.len()].copy_from_slice(chunk);
            }
            *block = Block::from_le_bytes(raw);
        }
        self.valid_bytes = bytes.len();
        self.valid_blocks = (bytes.len() + BLOCK_BYTES - 1) / BLOCK_BYTES;
        self.cursor = Some(0);
    }

    /// Take the block under the cursor and advance.
    fn take(&mut self) -> Block {
        let idx = self.pending();
        self.cursor = Some(idx + 1);
        self.blocks[idx]
    }

    /// Store 'block' under the cursor and advance.
    fn push(&mut self, block: Block) {
        let idx = self.pending();
        debug_assert!(idx < self.capacity(), "Pushing into a full buffer");
        self.blocks[idx] = block;
        self.cursor = Some(idx + 1);
    }
}

/// What 'get_block' has to do before it can hand out a block.
enum ReadAction {
    Fill,
    Eof,
    Take,
}

/// Owns one input, one output, and the two block buffers between them.
pub struct BlockStream<R = File, W = File> {
    input: R,
    output: W,
    read_buf: BlockBuffer,
    write_buf: BlockBuffer,
    /// Byte staging area for the conversions between disk and blocks.
    scratch: Vec<u8>,
    bytes_read: u64,
    bytes_written: u64,
}

impl BlockStream<File, File> {
    /// Open 'input_path' for reading and create 'output_path' for writing.
    pub fn open(
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
    ) -> Result<Self, IoError> {
        Self::open_with_capacity(input_path, output_path, DEFAULT_BUFFER_BLOCKS)
    }

    /// Same as 'open', with buffers of 'capacity' blocks.
    pub fn open_with_capacity(
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        capacity: usize,
    ) -> Result<Self, IoError> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();
        let input = File::open(input_path).map_err(|source| IoError::Open {
            path: input_path.to_path_buf(),
            source,
        })?;
        let output =
            File::create(output_path).map_err(|source| IoError::Open {
                path: output_path.to_path_buf(),
                source,
            })?;
        log::debug!(
            "Opened {} -> {}",
            input_path.display(),
            output_path.display()
        );
        Ok(Self::new(input, output, capacity))
    }
}

impl<R: Read, W: Write> BlockStream<R, W> {
    /// Wrap 'input' and 'output' with buffers of 'capacity' blocks.
    pub fn new(input: R, output: W, capacity: usize) -> Self {
        Self {
            input,
            output,
            read_buf: BlockBuffer::new(capacity),
            write_buf: BlockBuffer::new(capacity),
            scratch: Vec::with_capacity(capacity * BLOCK_BYTES),
            bytes_read: 0,
            bytes_written: 0,
        }
    }

    /// Returns the number of bytes that were read from the input so far.
    #[must_use]
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the number of bytes that were written to the output so far.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Read as much of the input as the read buffer can hold.
    fn fill(&mut self) -> Result<(), IoError> {
        let want = self.read_buf.capacity() * BLOCK_BYTES;
        self.scratch.clear();
        self.scratch.resize(want, 0);

        let mut filled = 0;
        while filled < want {
            match self.input.read(&mut self.scratch[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return Err(IoError::Read(err)),
            }
        }

        if filled == 0 {
            return Err(IoError::Eof);
        }

        self.read_buf.load(&self.scratch[..filled]);
        self.bytes_read += filled as u64;
        log::debug!(
            "Loaded {} bytes into {} blocks",
            filled,
            self.read_buf.valid_blocks
        );
        Ok(())
    }

    /// Returns the next block of the input. The last block of the input is
    /// zero padded. Returns 'IoError::Eof' when the input is exhausted.
    pub fn get_block(&mut self) -> Result<Block, IoError> {
        let buf = &self.read_buf;
        let action = match buf.cursor {
            None => ReadAction::Fill,
            Some(c) if c == buf.capacity() => ReadAction::Fill,
            Some(c) if c == buf.valid_blocks => ReadAction::Eof,
            Some(_) => ReadAction::Take,
        };

        match action {
            ReadAction::Fill => self.fill()?,
            ReadAction::Eof => return Err(IoError::Eof),
            ReadAction::Take => {}
        }
        Ok(self.read_buf.take())
    }

    /// Returns the number of input bytes that the block returned by the last
    /// call to 'get_block' holds. This is 'BLOCK_BYTES' for all of the blocks
    /// except for the last one.
    #[must_use]
    pub fn valid_bytes(&self) -> usize {
        let buf = &self.read_buf;
        match buf.cursor {
            Some(c) if c > 0 => {
                let start = (c - 1) * BLOCK_BYTES;
                buf.valid_bytes.saturating_sub(start).min(BLOCK_BYTES)
            }
            _ => 0,
        }
    }

    /// Append 'block' to the output. The output is written to disk when the
    /// write buffer is full.
    pub fn put_block(&mut self, block: Block) -> Result<(), IoError> {
        if self.write_buf.is_full() {
            // More blocks follow, so nothing in the buffer is trimmed.
            self.flush(false)?;
        }
        self.write_buf.push(block);
        Ok(())
    }

    /// Write the pending blocks to disk. If 'trim_last' is set then the last
    /// block is written without its top zero bytes.
    fn flush(&mut self, trim_last: bool) -> Result<(), IoError> {
        let count = self.write_buf.pending();
        if count == 0 {
            return Ok(());
        }

        let pending = &self.write_buf.blocks[..count];
        let (whole, last) = if trim_last {
            (&pending[..count - 1], Some(pending[count - 1]))
        } else {
            (pending, None)
        };

        self.scratch.clear();
        for block in whole {
            self.scratch.extend_from_slice(&block.to_le_bytes());
        }
        if let Some(block) = last {
            let bytes = block.to_le_bytes();
            self.scratch.extend_from_slice(&bytes[..trimmed_len(block)]);
        }

        self.output.write_all(&self.scratch).map_err(IoError::Write)?;
        self.bytes_written += self.scratch.len() as u64;
        log::debug!("Flushed {} blocks ({} bytes)", count, self.scratch.len());
        self.write_buf.reset();
        Ok(())
    }

    /// Flush the pending output and release the stream. Returns the output
    /// handle, which is closed when dropped.
    pub fn close(mut self) -> Result<W, IoError> {
        self.flush(true)?;
        self.output.flush().map_err(IoError::Write)?;
        log::debug!(
            "Closed the stream after reading {} and writing {} bytes",
            self.bytes_read,
            self.bytes_written
        );
        Ok(self.output)
    }
}

impl<R: Read + Seek, W: Write> BlockStream<R, W> {
    /// Move back to the start of the input. The next call to 'get_block'
    /// reads from the disk again.
    pub fn rewind(&mut self) -> Result<(), IoError> {
        self.input.seek(SeekFrom::Start(0)).map_err(IoError::Read)?;
        self.read_buf.reset();
        log::debug!("Rewound the input");
        Ok(())
    }
}
