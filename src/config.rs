/// Configuration of a single device on the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// The 7-bit bus address of the device.
    pub address: u8,
}

impl Config {
    /// Creates a new `Config` instance.
    ///
    /// # Arguments
    ///
    /// * `address` - The 7-bit bus address of the device.
    ///
    /// # Returns
    ///
    /// A new `Config` addressing the given device.
    pub fn new(address: u8) -> Config {
        Config { address }
    }

    /// Sets the device address for the configuration.
    ///
    /// # Arguments
    ///
    /// * `address` - The 7-bit bus address to set.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }
}
