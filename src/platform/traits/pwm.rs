//! PWM interface trait
//!
//! Intensity lines are written in raw counts, `0..=max_duty_cycle()`, where the
//! maximum follows from the configured resolution (8 bits ⇒ 255).

use crate::platform::Result;

/// Lowest supported PWM resolution in bits
pub const MIN_PWM_BITS: u8 = 1;

/// Highest supported PWM resolution in bits
pub const MAX_PWM_BITS: u8 = 16;

/// PWM configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmConfig {
    /// Carrier frequency in Hz (`0` leaves the hardware default untouched)
    pub frequency: u32,
    /// Resolution in bits
    pub resolution_bits: u8,
}

impl PwmConfig {
    /// Build a config from carrier frequency and resolution
    pub const fn new(frequency: u32, resolution_bits: u8) -> Self {
        Self {
            frequency,
            resolution_bits,
        }
    }

    /// Largest duty value representable at this resolution
    pub const fn max_duty(&self) -> u16 {
        max_duty_for_bits(self.resolution_bits)
    }
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: 0,
            resolution_bits: 8,
        }
    }
}

/// `2^bits - 1`, saturating to the supported range
pub const fn max_duty_for_bits(bits: u8) -> u16 {
    let bits = if bits < MIN_PWM_BITS {
        MIN_PWM_BITS
    } else if bits > MAX_PWM_BITS {
        MAX_PWM_BITS
    } else {
        bits
    };
    ((1u32 << bits) - 1) as u16
}

/// PWM interface trait
///
/// # Safety Invariants
///
/// - Only one owner per PWM channel
/// - No concurrent access to the same PWM channel from multiple contexts
/// - Duty must not exceed `max_duty_cycle()`
pub trait PwmInterface {
    /// Set duty in raw counts
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidDutyCycle)` if `duty`
    /// exceeds `max_duty_cycle()`.
    fn set_duty_cycle(&mut self, duty: u16) -> Result<()>;

    /// Current duty in raw counts
    fn duty_cycle(&self) -> u16;

    /// Largest accepted duty at the current resolution
    fn max_duty_cycle(&self) -> u16;

    /// Program the carrier frequency
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidFrequency)` if the
    /// frequency cannot be produced by the timer.
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Current carrier frequency in Hz (`0` if never programmed)
    fn frequency(&self) -> u32;

    /// Program the resolution
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidResolution)` outside
    /// `MIN_PWM_BITS..=MAX_PWM_BITS`.
    fn set_resolution(&mut self, bits: u8) -> Result<()>;

    /// Current resolution in bits
    fn resolution(&self) -> u8;

    /// Enable PWM output (configures the pin as an output)
    fn enable(&mut self);

    /// Disable PWM output
    fn disable(&mut self);

    /// Check if PWM is enabled
    fn is_enabled(&self) -> bool;
}
