use core::fmt;

use embedded_hal::i2c::ErrorKind;

/// Status code reported for a successful operation.
pub const NO_ERROR: i16 = 0;

/// Errors reported by the protocol layer.
///
/// None of them is retried internally. Whether and how often to retry is
/// up to the sensor driver calling into this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A received word did not match its checksum.
    Crc,
    /// The transport failed for a reason other than a missing acknowledge
    /// (arbitration loss, timeout, hardware fault).
    I2cBus,
    /// The addressed device did not acknowledge.
    I2cNack,
    /// A length is not a multiple of the word size, or a buffer is too
    /// small for the frame it should hold.
    ByteCount,
    /// The transport does not provide the requested capability.
    NotImplemented,
}

impl Error {
    /// Returns the stable integer code of this error.
    pub const fn code(self) -> i16 {
        match self {
            Error::Crc => 1,
            Error::I2cBus => 2,
            Error::I2cNack => 3,
            Error::ByteCount => 4,
            // ENOSYS
            Error::NotImplemented => 88,
        }
    }

    /// Maps a stable integer code back to its error.
    ///
    /// Returns `None` for [`NO_ERROR`] and for unknown codes.
    pub const fn from_code(code: i16) -> Option<Error> {
        match code {
            1 => Some(Error::Crc),
            2 => Some(Error::I2cBus),
            3 => Some(Error::I2cNack),
            4 => Some(Error::ByteCount),
            88 => Some(Error::NotImplemented),
            _ => None,
        }
    }

    /// Classifies a transport error.
    pub fn from_bus<E: embedded_hal::i2c::Error>(error: &E) -> Error {
        match error.kind() {
            ErrorKind::NoAcknowledge(_) => Error::I2cNack,
            _ => Error::I2cBus,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Crc => f.write_str("checksum mismatch"),
            Error::I2cBus => f.write_str("I2C bus error"),
            Error::I2cNack => f.write_str("no acknowledge from device"),
            Error::ByteCount => f.write_str("invalid byte count"),
            Error::NotImplemented => f.write_str("not implemented"),
        }
    }
}

impl core::error::Error for Error {}
