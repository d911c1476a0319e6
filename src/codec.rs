//! Conversions between native numbers and the big-endian byte layout used on
//! the wire.
//!
//! Readers interpret the leading 2 or 4 bytes of a slice, writers fill the
//! leading 2 or 4 bytes of a slice. Sizing the slices is up to the caller;
//! every function panics if a slice is shorter than the value it holds.

/// Width of the destination integer of [`truncate_or_pad`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntType {
    Byte = 1,
    Short = 2,
    Integer = 4,
    LongInteger = 8,
}

impl IntType {
    /// Width of the integer in bytes.
    pub const fn width(self) -> usize {
        self as usize
    }
}

/// Reads a big-endian `u16` from the first 2 bytes of `bytes`.
pub fn bytes_to_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes([bytes[0], bytes[1]])
}

/// Reads a big-endian `u32` from the first 4 bytes of `bytes`.
pub fn bytes_to_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Reinterprets the big-endian 16-bit pattern as two's complement.
pub fn bytes_to_i16(bytes: &[u8]) -> i16 {
    bytes_to_u16(bytes) as i16
}

/// Reinterprets the big-endian 32-bit pattern as two's complement.
pub fn bytes_to_i32(bytes: &[u8]) -> i32 {
    bytes_to_u32(bytes) as i32
}

/// Reads an IEEE-754 single precision value.
///
/// The 32-bit pattern is bit-cast, not numerically converted, so every
/// pattern including NaN payloads survives unchanged.
pub fn bytes_to_float(bytes: &[u8]) -> f32 {
    f32::from_bits(bytes_to_u32(bytes))
}

/// Writes `value` big-endian into the first 2 bytes of `bytes`.
pub fn u16_to_bytes(value: u16, bytes: &mut [u8]) {
    bytes[..2].copy_from_slice(&value.to_be_bytes());
}

/// Writes `value` big-endian into the first 4 bytes of `bytes`.
pub fn u32_to_bytes(value: u32, bytes: &mut [u8]) {
    bytes[..4].copy_from_slice(&value.to_be_bytes());
}

/// Writes the two's complement pattern of `value` big-endian into the
/// first 2 bytes of `bytes`.
pub fn i16_to_bytes(value: i16, bytes: &mut [u8]) {
    u16_to_bytes(value as u16, bytes);
}

/// Writes the two's complement pattern of `value` big-endian into the
/// first 4 bytes of `bytes`.
pub fn i32_to_bytes(value: i32, bytes: &mut [u8]) {
    u32_to_bytes(value as u32, bytes);
}

/// Writes an IEEE-754 single precision value as its raw bit pattern.
pub fn float_to_bytes(value: f32, bytes: &mut [u8]) {
    u32_to_bytes(value.to_bits(), bytes);
}

/// Copies `length` bytes verbatim.
pub fn copy_bytes(source: &[u8], destination: &mut [u8], length: usize) {
    destination[..length].copy_from_slice(&source[..length]);
}

/// Copies the `data_length` leading bytes of `source` into the trailing
/// bytes of a big-endian destination `int_type` bytes wide and zero-fills
/// the remaining leading bytes.
///
/// If `data_length` exceeds the destination width nothing is copied and the
/// whole destination is zeroed. The data is discarded, not truncated.
pub fn truncate_or_pad(
    source: &[u8],
    destination: &mut [u8],
    int_type: IntType,
    data_length: usize,
) {
    let width = int_type.width();
    let copy_len = if data_length > width { 0 } else { data_length };
    let fill = width - copy_len;

    destination[..fill].fill(0);
    destination[fill..width].copy_from_slice(&source[..copy_len]);
}

/// Returns the value [`truncate_or_pad`] produces, zero-extended to `u64`.
pub fn integer_from_bytes(source: &[u8], int_type: IntType, data_length: usize) -> u64 {
    let mut bytes = [0u8; 8];
    let start = bytes.len() - int_type.width();
    truncate_or_pad(source, &mut bytes[start..], int_type, data_length);
    u64::from_be_bytes(bytes)
}
