//! I2C interface trait
//!
//! Blocking I2C master used by the motion sensor driver. Register helpers
//! cover the single-register write and burst read that register-mapped
//! sensors need.

use crate::platform::Result;

/// I2C configuration
#[derive(Debug, Clone, Copy)]
pub struct I2cConfig {
    /// Bus frequency in Hz
    pub frequency: u32,
    /// Timeout in microseconds
    pub timeout_us: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 400_000,
            timeout_us: 10_000,
        }
    }
}

/// I2C interface trait
///
/// # Safety Invariants
///
/// - Only one owner per I2C bus instance
/// - Address must be 7-bit (valid range: 0x00..=0x7F)
pub trait I2cInterface {
    /// Write data to a device
    ///
    /// START - ADDR(W) - DATA - STOP
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` on NACK, bus error or timeout.
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<()>;

    /// Read data from a device
    ///
    /// START - ADDR(R) - DATA - STOP
    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<()>;

    /// Write then read with a repeated START
    ///
    /// # Arguments
    ///
    /// * `addr` - 7-bit device address
    /// * `write_data` - Bytes to write (typically a register address)
    /// * `read_buffer` - Buffer receiving the response
    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()>;

    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Write one register
    fn write_register(&mut self, addr: u8, register: u8, value: u8) -> Result<()> {
        self.write(addr, &[register, value])
    }

    /// Read consecutive registers starting at `register`
    fn read_registers(&mut self, addr: u8, register: u8, buffer: &mut [u8]) -> Result<()> {
        self.write_read(addr, &[register], buffer)
    }

    /// Read a single register
    fn read_register(&mut self, addr: u8, register: u8) -> Result<u8> {
        let mut value = [0u8; 1];
        self.read_registers(addr, register, &mut value)?;
        Ok(value[0])
    }
}
