//! I2C interface trait
//!
//! This module defines the I2C bus communication interface that platform implementations must provide.

use crate::platform::Result;

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Bus frequency in Hz (typically 100_000 or 400_000)
    pub frequency: u32,
    /// Per-transaction timeout in microseconds
    pub timeout_us: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self {
            frequency: 100_000, // 100 kHz standard mode
            timeout_us: 2_000,  // must stay well inside one control period
        }
    }
}

/// I2C interface trait
///
/// # Safety Invariants
///
/// - I2C peripheral must be initialized before use
/// - Only one owner per I2C bus instance
/// - Address must be 7-bit (valid range: 0x00..=0x7F)
pub trait I2cInterface {
    /// Write data to an I2C device
    ///
    /// Performs START - ADDR(W) - DATA - STOP and returns the number of bytes
    /// the device acknowledged. A device that NACKs part-way through yields a
    /// count smaller than `data.len()`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` if:
    /// - The address is not acknowledged (NACK)
    /// - Bus error occurs
    /// - Timeout expires
    fn write(&mut self, addr: u8, data: &[u8]) -> Result<usize>;

    /// Write then read with a repeated START
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` on NACK, bus error or timeout.
    fn write_read(&mut self, addr: u8, write_data: &[u8], read_buffer: &mut [u8]) -> Result<()>;

    /// Set I2C bus frequency
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Bound every transaction to `timeout_us`
    fn set_timeout(&mut self, timeout_us: u32) -> Result<()>;
}
