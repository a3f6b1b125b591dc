//! Servo pulse output trait
//!
//! ESC-style drivers are commanded by a pulse width in microseconds, repeated
//! every servo frame (20 ms at 50 Hz).

use crate::platform::Result;

/// Servo frame period in microseconds (50 Hz)
pub const SERVO_FRAME_US: u32 = 20_000;

/// Servo frame rate in Hz
pub const SERVO_FRAME_HZ: u32 = 50;

/// Pulse-width output for servos and ESCs
pub trait ServoInterface {
    /// Start generating pulses on the pin
    fn attach(&mut self) -> Result<()>;

    /// Stop generating pulses
    fn detach(&mut self);

    /// Whether the output is attached
    fn is_attached(&self) -> bool;

    /// Set the pulse width
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Servo(ServoError::NotAttached)` before
    /// `attach()`, and `ServoError::InvalidPulse` if the width exceeds the
    /// servo frame.
    fn write_microseconds(&mut self, pulse_us: u16) -> Result<()>;

    /// Last pulse width written
    fn microseconds(&self) -> u16;
}
