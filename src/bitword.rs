//! Primitives for reading and writing single bits and bytes at arbitrary bit
//! offsets inside a block. Offset zero is the least significant bit.
//! These are the only functions in the crate that touch the bits of a block.

/// The unit of buffered I/O. The bytes of a block are ordered least
/// significant byte first, which matches their order on disk.
pub type Block = u64;

/// The number of bits in a block.
pub const BLOCK_BITS: u32 = Block::BITS;

/// The number of bytes in a block.
pub const BLOCK_BYTES: usize = (Block::BITS / 8) as usize;

/// Returns the bit at offset 'pos' (0 or 1).
#[must_use]
pub fn get_bit(word: Block, pos: u32) -> u8 {
    debug_assert!(pos < BLOCK_BITS, "Bit offset out of range");
    ((word >> pos) & 1) as u8
}

/// Returns 'word' with the bit at offset 'pos' set to 'bit'. Only the lowest
/// bit of 'bit' is used.
#[must_use]
pub fn put_bit(word: Block, bit: u8, pos: u32) -> Block {
    debug_assert!(pos < BLOCK_BITS, "Bit offset out of range");
    let mask: Block = 1 << pos;
    (word & !mask) | (((bit & 1) as Block) << pos)
}

/// Returns the 8 bits that start at offset 'pos'.
#[must_use]
pub fn get_byte(word: Block, pos: u32) -> u8 {
    debug_assert!(pos + 8 <= BLOCK_BITS, "Byte offset out of range");
    (word >> pos) as u8
}

/// Returns 'word' with the 8 bits that start at offset 'pos' replaced by
/// 'byte'. All of the other bits are preserved.
#[must_use]
pub fn put_byte(word: Block, byte: u8, pos: u32) -> Block {
    debug_assert!(pos + 8 <= BLOCK_BITS, "Byte offset out of range");
    let mask: Block = 0xff << pos;
    (word & !mask) | ((byte as Block) << pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_bit_keeps_neighbors() {
        let word = put_bit(Block::MAX, 0, 17);
        assert_eq!(word, !(1u64 << 17));
        assert_eq!(put_bit(word, 1, 17), Block::MAX);
        // Only the lowest bit of the argument counts.
        assert_eq!(put_bit(0, 0b10, 3), 0);
    }

    #[test]
    fn test_put_byte_at_top() {
        let word = put_byte(0, 0xa5, BLOCK_BITS - 8);
        assert_eq!(word, 0xa5_u64 << 56);
        assert_eq!(get_byte(word, BLOCK_BITS - 8), 0xa5);
    }
}
