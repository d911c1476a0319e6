//! Assembly and validation of checksummed frames.
//!
//! Outgoing frames are built incrementally: every `add_*` function writes at
//! `offset` into a caller-owned buffer and returns the offset of the next
//! free byte, so a frame is composed by threading the offset through a chain
//! of calls. A call that would not fit the remaining capacity fails with
//! [`Error::ByteCount`] before writing anything.
//!
//! ```text
//! [opcode][w0 hi][w0 lo][crc w0][w1 hi][w1 lo][crc w1]...
//! ```

use log::debug;

use crate::codec;
use crate::constants::{wire_size, COMMAND_SIZE, CRC8_LEN, WORD_SIZE};
use crate::crc;
use crate::error::Error;

// Ensures `needed` bytes fit at `offset`.
fn reserve(buffer: &[u8], offset: usize, needed: usize) -> Result<(), Error> {
    match offset.checked_add(needed) {
        Some(end) if end <= buffer.len() => Ok(()),
        _ => {
            debug!(
                "Frame overflow: {} bytes at offset {} exceed capacity {}",
                needed,
                offset,
                buffer.len()
            );
            Err(Error::ByteCount)
        }
    }
}

// Writes one word and its checksum. Capacity must have been reserved.
fn put_word(buffer: &mut [u8], offset: usize, word: &[u8]) -> usize {
    buffer[offset..offset + WORD_SIZE].copy_from_slice(&word[..WORD_SIZE]);
    buffer[offset + WORD_SIZE] = crc::generate(&word[..WORD_SIZE]);
    offset + WORD_SIZE + CRC8_LEN
}

/// Adds a 16-bit command at `offset`. Opcodes carry no checksum.
pub fn add_command16(buffer: &mut [u8], offset: usize, command: u16) -> Result<usize, Error> {
    reserve(buffer, offset, COMMAND_SIZE)?;
    codec::u16_to_bytes(command, &mut buffer[offset..]);
    Ok(offset + COMMAND_SIZE)
}

/// Same as [`add_command16`].
pub fn add_command(buffer: &mut [u8], offset: usize, command: u16) -> Result<usize, Error> {
    add_command16(buffer, offset, command)
}

/// Adds a single byte command, used by sensors with 8-bit opcodes.
pub fn add_command8(buffer: &mut [u8], offset: usize, command: u8) -> Result<usize, Error> {
    reserve(buffer, offset, 1)?;
    buffer[offset] = command;
    Ok(offset + 1)
}

/// Adds one word followed by its checksum (3 bytes).
pub fn add_u16(buffer: &mut [u8], offset: usize, value: u16) -> Result<usize, Error> {
    reserve(buffer, offset, wire_size(1))?;
    Ok(put_word(buffer, offset, &value.to_be_bytes()))
}

/// Adds one word followed by its checksum (3 bytes).
pub fn add_i16(buffer: &mut [u8], offset: usize, value: i16) -> Result<usize, Error> {
    add_u16(buffer, offset, value as u16)
}

/// Adds two words, each followed by its own checksum (6 bytes).
pub fn add_u32(buffer: &mut [u8], offset: usize, value: u32) -> Result<usize, Error> {
    let mut bytes = [0u8; 4];
    codec::u32_to_bytes(value, &mut bytes);
    add_bytes(buffer, offset, &bytes)
}

/// Adds two words, each followed by its own checksum (6 bytes).
pub fn add_i32(buffer: &mut [u8], offset: usize, value: i32) -> Result<usize, Error> {
    add_u32(buffer, offset, value as u32)
}

/// Adds the bit pattern of `value` as two checksummed words (6 bytes).
pub fn add_float(buffer: &mut [u8], offset: usize, value: f32) -> Result<usize, Error> {
    add_u32(buffer, offset, value.to_bits())
}

/// Adds `data` as a run of checksummed words.
///
/// `data.len()` must be a multiple of the word size. Advances the offset by
/// `len + len / 2`.
pub fn add_bytes(buffer: &mut [u8], offset: usize, data: &[u8]) -> Result<usize, Error> {
    if data.len() % WORD_SIZE != 0 {
        debug!("Cannot frame {} bytes, not a whole number of words", data.len());
        return Err(Error::ByteCount);
    }
    reserve(buffer, offset, wire_size(data.len() / WORD_SIZE))?;

    let mut offset = offset;
    for word in data.chunks_exact(WORD_SIZE) {
        offset = put_word(buffer, offset, word);
    }
    Ok(offset)
}

/// Builds a complete request: a 16-bit command followed by each argument as
/// a checksummed word.
///
/// Returns the number of bytes written, `2 + 3 * args.len()`.
pub fn fill_command_send_buffer(
    buffer: &mut [u8],
    command: u16,
    args: &[u16],
) -> Result<usize, Error> {
    reserve(buffer, 0, COMMAND_SIZE + wire_size(args.len()))?;

    let mut offset = add_command16(buffer, 0, command)?;
    for &arg in args {
        offset = add_u16(buffer, offset, arg)?;
    }
    Ok(offset)
}

/// Validates a received run of words and strips their checksums.
///
/// `buffer` holds `expected_data_length / 2` word and checksum triplets. On
/// success its first `expected_data_length` bytes are the data bytes in
/// their original order. On a checksum mismatch the contents from the
/// failing word onward are unspecified.
pub fn read_data_in_place(buffer: &mut [u8], expected_data_length: usize) -> Result<(), Error> {
    if expected_data_length % WORD_SIZE != 0 {
        debug!(
            "Expected data length {} is not a whole number of words",
            expected_data_length
        );
        return Err(Error::ByteCount);
    }
    let num_words = expected_data_length / WORD_SIZE;
    reserve(buffer, 0, wire_size(num_words))?;

    for index in 0..num_words {
        let source = wire_size(index);
        let word = &buffer[source..source + WORD_SIZE];
        let checksum = buffer[source + WORD_SIZE];
        if !crc::check(word, checksum) {
            debug!(
                "Checksum mismatch in word {}: {:02X?}, received {:02X}, calculated {:02X}",
                index,
                word,
                checksum,
                crc::generate(word)
            );
            return Err(Error::Crc);
        }
        buffer.copy_within(source..source + WORD_SIZE, index * WORD_SIZE);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_BUFFER_WORDS;
    use test_case::test_case;

    #[test]
    fn commands_have_no_checksum() {
        let mut buffer = [0u8; 3];
        let offset = add_command16(&mut buffer, 0, 0x3639).unwrap();
        assert_eq!(offset, 2);
        let offset = add_command8(&mut buffer, offset, 0xFD).unwrap();
        assert_eq!(offset, 3);
        assert_eq!(buffer, [0x36, 0x39, 0xFD]);
    }

    #[test]
    fn word_is_followed_by_its_checksum() {
        let mut buffer = [0u8; 4];
        let offset = add_u16(&mut buffer, 1, 0xBEEF).unwrap();
        assert_eq!(offset, 4);
        assert_eq!(buffer, [0x00, 0xBE, 0xEF, 0x92]);
    }

    #[test]
    fn signed_word_uses_twos_complement() {
        let mut signed = [0u8; 3];
        let mut unsigned = [0u8; 3];
        add_i16(&mut signed, 0, -1).unwrap();
        add_u16(&mut unsigned, 0, 0xFFFF).unwrap();
        assert_eq!(signed, unsigned);
    }

    #[test]
    fn u32_gets_one_checksum_per_word() {
        let mut buffer = [0u8; 6];
        let offset = add_u32(&mut buffer, 0, 0xBEEF_BEEF).unwrap();
        assert_eq!(offset, 6);
        assert_eq!(buffer, [0xBE, 0xEF, 0x92, 0xBE, 0xEF, 0x92]);
    }

    #[test]
    fn float_is_framed_as_its_bit_pattern() {
        let mut float = [0u8; 6];
        let mut bits = [0u8; 6];
        add_float(&mut float, 0, 1.5).unwrap();
        add_u32(&mut bits, 0, 1.5f32.to_bits()).unwrap();
        assert_eq!(float, bits);

        let mut signed = [0u8; 6];
        add_i32(&mut signed, 0, -2).unwrap();
        assert_eq!(&signed[..2], &[0xFF, 0xFF]);
        assert_eq!(&signed[3..5], &[0xFF, 0xFE]);
    }

    #[test]
    fn add_bytes_interleaves_checksums() {
        let mut buffer = [0u8; 9];
        let offset = add_bytes(&mut buffer, 0, &[0xBE, 0xEF, 0x00, 0x00, 0xBE, 0xEF]).unwrap();
        assert_eq!(offset, 9);
        assert_eq!(
            buffer,
            [0xBE, 0xEF, 0x92, 0x00, 0x00, crc::generate(&[0, 0]), 0xBE, 0xEF, 0x92]
        );
    }

    #[test]
    fn add_bytes_rejects_partial_word_without_writing() {
        let mut buffer = [0xAA; 8];
        assert_eq!(add_bytes(&mut buffer, 2, &[1, 2, 3]), Err(Error::ByteCount));
        assert_eq!(buffer, [0xAA; 8]);
    }

    #[test_case(0; "no room for checksum")]
    #[test_case(2; "offset at end")]
    #[test_case(usize::MAX; "offset overflow")]
    fn word_overflowing_capacity_is_rejected(offset: usize) {
        let mut buffer = [0xAA; 2];
        assert_eq!(add_u16(&mut buffer, offset, 0x1234), Err(Error::ByteCount));
        assert_eq!(buffer, [0xAA; 2]);
    }

    #[test]
    fn add_u32_does_not_write_half_a_value() {
        let mut buffer = [0xAA; 5];
        assert_eq!(add_u32(&mut buffer, 0, 0x1234_5678), Err(Error::ByteCount));
        assert_eq!(buffer, [0xAA; 5]);
    }

    #[test]
    fn fill_command_send_buffer_decodes_back() {
        let args = [0x0000, 0x1234, 0xFFFF];
        let mut buffer = [0u8; 16];
        let len = fill_command_send_buffer(&mut buffer, 0x2416, &args).unwrap();
        assert_eq!(len, 2 + args.len() * 3);
        assert_eq!(codec::bytes_to_u16(&buffer), 0x2416);

        let payload = &mut buffer[COMMAND_SIZE..len];
        read_data_in_place(payload, args.len() * WORD_SIZE).unwrap();
        for (index, &arg) in args.iter().enumerate() {
            assert_eq!(codec::bytes_to_u16(&payload[index * WORD_SIZE..]), arg);
        }
    }

    #[test]
    fn fill_command_send_buffer_without_args() {
        let mut buffer = [0u8; 2];
        assert_eq!(fill_command_send_buffer(&mut buffer, 0x3639, &[]), Ok(2));
        assert_eq!(buffer, [0x36, 0x39]);
    }

    #[test]
    fn fill_command_send_buffer_checks_capacity_up_front() {
        let mut buffer = [0xAA; 7];
        assert_eq!(
            fill_command_send_buffer(&mut buffer, 0x3639, &[1, 2]),
            Err(Error::ByteCount)
        );
        assert_eq!(buffer, [0xAA; 7]);
    }

    #[test]
    fn read_data_in_place_compacts_words() {
        let mut buffer = [0u8; 3 * MAX_BUFFER_WORDS];
        let mut offset = 0;
        for word in 0..MAX_BUFFER_WORDS as u16 {
            offset = add_u16(&mut buffer, offset, word * 0x0101).unwrap();
        }

        read_data_in_place(&mut buffer, MAX_BUFFER_WORDS * WORD_SIZE).unwrap();
        for word in 0..MAX_BUFFER_WORDS {
            assert_eq!(
                codec::bytes_to_u16(&buffer[word * WORD_SIZE..]),
                word as u16 * 0x0101
            );
        }
    }

    #[test]
    fn read_data_in_place_reports_corrupt_checksum() {
        let mut buffer = [0u8; 9];
        add_bytes(&mut buffer, 0, &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]).unwrap();
        buffer[5] ^= 0x01;
        assert_eq!(read_data_in_place(&mut buffer, 6), Err(Error::Crc));
        // Words before the failure are already compacted.
        assert_eq!(&buffer[..2], &[0x01, 0x02]);
    }

    #[test]
    fn read_data_in_place_rejects_odd_length() {
        let mut buffer = [0u8; 9];
        assert_eq!(read_data_in_place(&mut buffer, 5), Err(Error::ByteCount));
    }

    #[test]
    fn read_data_in_place_rejects_short_buffer() {
        let mut buffer = [0u8; 8];
        assert_eq!(read_data_in_place(&mut buffer, 6), Err(Error::ByteCount));
    }

    #[test]
    fn read_data_in_place_accepts_empty_read() {
        let mut buffer: [u8; 0] = [];
        assert_eq!(read_data_in_place(&mut buffer, 0), Ok(()));
    }
}
