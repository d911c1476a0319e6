//! Word checksum of the Sensirion I2C protocol.
//!
//! Every 2-byte word on the bus is followed by a CRC-8 computed over just
//! that word. The algorithm uses polynomial 0x31, an initial value of 0xFF,
//! no bit reflection and no output XOR, processing each byte MSB first.

use crc_all::CrcAlgo;

use crate::constants::{CRC8_INIT, CRC8_POLYNOMIAL};

const CRC8: CrcAlgo<u8> = CrcAlgo::<u8>::new(
    CRC8_POLYNOMIAL, // polynomial
    8,               // width
    CRC8_INIT,       // init
    0,               // xorout
    false,           // reflect
);

/// Calculates the CRC-8 over a run of bytes.
pub fn generate(data: &[u8]) -> u8 {
    let mut crc = CRC8_INIT;
    CRC8.update_crc(&mut crc, data);
    CRC8.finish_crc(&crc)
}

/// Returns `true` if `checksum` is the CRC-8 of `data`.
pub fn check(data: &[u8], checksum: u8) -> bool {
    generate(data) == checksum
}
