// COMMAND_SIZE is the number of bytes of a regular (16-bit) command opcode.
pub const COMMAND_SIZE: usize = 2;

// WORD_SIZE is the number of data bytes in one word, the unit every argument
// and every response is made of.
pub const WORD_SIZE: usize = 2;

// CRC8_LEN is the number of checksum bytes following each word on the wire.
pub const CRC8_LEN: usize = 1;

// CRC8_POLYNOMIAL is the generator polynomial of the word checksum
// (x^8 + x^5 + x^4 + 1).
pub const CRC8_POLYNOMIAL: u8 = 0x31;

// CRC8_INIT is the initial register value of the word checksum.
pub const CRC8_INIT: u8 = 0xFF;

// MAX_BUFFER_WORDS is the largest number of words a single transaction can
// carry. The engine stages frames in stack buffers sized from it.
pub const MAX_BUFFER_WORDS: usize = 32;

// GENERAL_CALL_ADDRESS is the reserved bus address every device listens on.
pub const GENERAL_CALL_ADDRESS: u8 = 0x00;

// GENERAL_CALL_RESET is the payload of the general call reset broadcast.
pub const GENERAL_CALL_RESET: u8 = 0x06;

/// Number of bytes a run of `num_words` words occupies on the wire,
/// checksums included.
pub const fn wire_size(num_words: usize) -> usize {
    num_words * (WORD_SIZE + CRC8_LEN)
}
