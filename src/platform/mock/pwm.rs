//! Mock PWM implementation for testing

use crate::platform::{
    Result,
    error::{PlatformError, PwmError},
    traits::{MAX_PWM_BITS, MIN_PWM_BITS, PwmConfig, PwmInterface, max_duty_for_bits},
};

/// Mock PWM implementation
///
/// Tracks duty, frequency, resolution and enable state. Like real timers it
/// refuses duty values above the configured resolution, so tests can prove
/// drivers clamp before writing.
#[derive(Debug)]
pub struct MockPwm {
    duty_cycle: u16,
    frequency: u32,
    resolution_bits: u8,
    enabled: bool,
    writes: u32,
}

impl MockPwm {
    /// Create a new mock PWM (disabled, hardware-default frequency)
    pub fn new(config: PwmConfig) -> Self {
        Self {
            duty_cycle: 0,
            frequency: config.frequency,
            resolution_bits: config.resolution_bits,
            enabled: false,
            writes: 0,
        }
    }

    /// Number of successful duty writes
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl Default for MockPwm {
    fn default() -> Self {
        Self::new(PwmConfig::default())
    }
}

impl PwmInterface for MockPwm {
    fn set_duty_cycle(&mut self, duty: u16) -> Result<()> {
        if duty > self.max_duty_cycle() {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.duty_cycle = duty;
        self.writes += 1;
        Ok(())
    }

    fn duty_cycle(&self) -> u16 {
        self.duty_cycle
    }

    fn max_duty_cycle(&self) -> u16 {
        max_duty_for_bits(self.resolution_bits)
    }

    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == 0 {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        self.frequency = frequency;
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }

    fn set_resolution(&mut self, bits: u8) -> Result<()> {
        if !(MIN_PWM_BITS..=MAX_PWM_BITS).contains(&bits) {
            return Err(PlatformError::Pwm(PwmError::InvalidResolution));
        }
        self.resolution_bits = bits;
        self.duty_cycle = self.duty_cycle.min(self.max_duty_cycle());
        Ok(())
    }

    fn resolution(&self) -> u8 {
        self.resolution_bits
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
