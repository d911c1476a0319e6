#![cfg_attr(not(test), no_std)]

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

pub mod buffer;
pub mod codec;
pub mod crc;

pub use codec::IntType;

// Largest request: a command followed by the maximum number of argument words.
const SEND_BUFFER_SIZE: usize = COMMAND_SIZE + wire_size(MAX_BUFFER_WORDS);

// Largest response: the maximum number of words with their checksums.
const RECEIVE_BUFFER_SIZE: usize = wire_size(MAX_BUFFER_WORDS);

// Rejects responses that do not fit the receive buffer.
fn check_word_count(num_words: usize) -> Result<(), Error> {
    if num_words > MAX_BUFFER_WORDS {
        debug!(
            "Cannot read {} words, at most {} fit one transaction",
            num_words, MAX_BUFFER_WORDS
        );
        return Err(Error::ByteCount);
    }
    Ok(())
}

/// Command and response exchange with a single Sensirion sensor.
///
/// Each transaction writes a command frame, optionally waits for the sensor
/// to process it and reads back a run of checksummed words. A transaction
/// stops at the first failure: a write that is not acknowledged is never
/// followed by a delay or a read. Nothing is retried.
///
/// # Type Parameters
///
/// * `I2C`: The bus the sensor is attached to. It must implement
///   `embedded_hal::i2c::I2c`. Sharing one bus between several drivers is
///   the job of the bus implementation.
/// * `D`: The blocking delay used while the sensor processes a command. It
///   must implement `embedded_hal::delay::DelayNs`.
pub struct SensirionI2c<I2C, D> {
    i2c: I2C,
    delay: D,
    config: Config,
}

impl<I2C, D> SensirionI2c<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Creates a new `SensirionI2c` instance.
    ///
    /// # Arguments
    ///
    /// * `i2c`: The bus the sensor is attached to.
    /// * `delay`: The delay provider used between command and response.
    /// * `config`: The configuration addressing the sensor.
    ///
    /// # Returns
    ///
    /// A new `SensirionI2c` instance.
    pub fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Self { i2c, delay, config }
    }

    /// Returns the configuration of this instance.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Destroys the instance and returns the bus and the delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Writes a command without arguments.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor acknowledged the command.
    /// * `Err(Error::I2cNack)` if the sensor did not acknowledge.
    /// * `Err(Error::I2cBus)` for any other bus failure.
    pub fn write_command(&mut self, command: u16) -> Result<(), Error> {
        let mut frame = [0u8; COMMAND_SIZE];
        let len = buffer::add_command16(&mut frame, 0, command)?;
        self.write_data(&frame[..len])
    }

    /// Writes a command followed by argument words, each with its checksum.
    ///
    /// # Arguments
    ///
    /// * `command`: The 16-bit command.
    /// * `words`: The argument words, at most [`MAX_BUFFER_WORDS`].
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the sensor acknowledged the frame.
    /// * `Err(Error::ByteCount)` if there are too many argument words.
    /// * `Err(Error::I2cNack)` or `Err(Error::I2cBus)` for bus failures.
    pub fn write_command_with_args(&mut self, command: u16, words: &[u16]) -> Result<(), Error> {
        let mut frame = [0u8; SEND_BUFFER_SIZE];
        let len = buffer::fill_command_send_buffer(&mut frame, command, words)?;
        self.write_data(&frame[..len])
    }

    /// Writes a frame assembled by the caller, for example with
    /// [`buffer::add_command8`] and the `buffer::add_*` word functions.
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), Error> {
        let address = self.config.address;
        debug!("Writing to 0x{:02X}: {:02X?}", address, data);
        self.i2c.write(address, data).map_err(|e| {
            debug!("Write to 0x{:02X} failed: {:?}", address, e);
            Error::from_bus(&e)
        })
    }

    /// Reads `expected_data_length` data bytes, with their checksums, into
    /// `frame` and strips the checksums in place.
    ///
    /// `frame` must hold the data including checksums, one and a half times
    /// `expected_data_length`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` with the data bytes at the start of `frame`.
    /// * `Err(Error::ByteCount)` if the length is not a whole number of words
    ///   or the buffer is too small. Nothing is read from the bus.
    ///
    /// A length of zero succeeds without reading from the bus.
    /// * `Err(Error::Crc)` if a received word does not match its checksum.
    /// * `Err(Error::I2cNack)` or `Err(Error::I2cBus)` for bus failures.
    pub fn read_data_in_place(
        &mut self,
        frame: &mut [u8],
        expected_data_length: usize,
    ) -> Result<(), Error> {
        if expected_data_length % WORD_SIZE != 0 {
            return Err(Error::ByteCount);
        }
        let size = wire_size(expected_data_length / WORD_SIZE);
        if size > frame.len() {
            debug!(
                "Read of {} bytes does not fit a buffer of {}",
                size,
                frame.len()
            );
            return Err(Error::ByteCount);
        }
        if size == 0 {
            return Ok(());
        }

        let address = self.config.address;
        self.i2c.read(address, &mut frame[..size]).map_err(|e| {
            debug!("Read from 0x{:02X} failed: {:?}", address, e);
            Error::from_bus(&e)
        })?;
        debug!("Read from 0x{:02X}: {:02X?}", address, &frame[..size]);

        buffer::read_data_in_place(frame, expected_data_length)
    }

    /// Reads `num_words` words and keeps them as big-endian bytes.
    ///
    /// # Arguments
    ///
    /// * `data`: Receives `2 * num_words` validated data bytes.
    /// * `num_words`: The number of words to read, at most
    ///   [`MAX_BUFFER_WORDS`].
    pub fn read_words_as_bytes(&mut self, data: &mut [u8], num_words: usize) -> Result<(), Error> {
        check_word_count(num_words)?;
        if data.len() < num_words * WORD_SIZE {
            debug!("Cannot read {} words into {} bytes", num_words, data.len());
            return Err(Error::ByteCount);
        }
        let mut frame = [0u8; RECEIVE_BUFFER_SIZE];
        let size = num_words * WORD_SIZE;
        self.read_data_in_place(&mut frame, size)?;
        codec::copy_bytes(&frame, data, size);
        Ok(())
    }

    /// Reads one word for every element of `words`.
    ///
    /// Reads `3 * words.len()` bytes from the sensor and validates the
    /// checksum of every word before converting it. An empty `words` slice
    /// does not touch the bus.
    ///
    /// # Returns
    ///
    /// * `Ok(())` with `words` filled in the order they were received.
    /// * `Err(Error::ByteCount)` if more than [`MAX_BUFFER_WORDS`] words are
    ///   requested.
    /// * `Err(Error::Crc)` if a received word does not match its checksum.
    /// * `Err(Error::I2cNack)` or `Err(Error::I2cBus)` for bus failures.
    pub fn read_words(&mut self, words: &mut [u16]) -> Result<(), Error> {
        let mut bytes = [0u8; MAX_BUFFER_WORDS * WORD_SIZE];
        self.read_words_as_bytes(&mut bytes, words.len())?;

        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(WORD_SIZE)) {
            *word = codec::bytes_to_u16(chunk);
        }
        Ok(())
    }

    /// Writes a command, waits `delay_us` microseconds for the sensor to
    /// process it and reads the response.
    ///
    /// Most sensors need several milliseconds between a measurement command
    /// and the moment the result can be read.
    ///
    /// # Arguments
    ///
    /// * `command`: The 16-bit command.
    /// * `delay_us`: The processing time of the command in microseconds.
    /// * `words`: Receives the response words, at most [`MAX_BUFFER_WORDS`].
    ///   Too many words fail with `Error::ByteCount` before the command is
    ///   written.
    pub fn delayed_read_command(
        &mut self,
        command: u16,
        delay_us: u32,
        words: &mut [u16],
    ) -> Result<(), Error> {
        check_word_count(words.len())?;
        self.write_command(command)?;
        debug!("Waiting {} us for command 0x{:04X}", delay_us, command);
        self.delay.delay_us(delay_us);
        self.read_words(words)
    }

    /// Writes a command and reads the response right away.
    ///
    /// Used when the sensor needs no processing time for `command` or the
    /// caller already waited long enough.
    pub fn read_command(&mut self, command: u16, words: &mut [u16]) -> Result<(), Error> {
        check_word_count(words.len())?;
        self.write_command(command)?;
        self.read_words(words)
    }

    /// Sends a general call reset.
    ///
    /// This resets every device on the bus that supports general call reset,
    /// not only the configured sensor. The broadcast is unaddressed, so
    /// success only means the transport accepted it.
    pub fn general_call_reset(&mut self) -> Result<(), Error> {
        debug!("Sending general call reset");
        self.i2c
            .write(GENERAL_CALL_ADDRESS, &[GENERAL_CALL_RESET])
            .map_err(|e| {
                debug!("General call reset failed: {:?}", e);
                Error::from_bus(&e)
            })
    }
}
