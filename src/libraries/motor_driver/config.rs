//! Motor driver configuration
//!
//! A [`DriverConfig`] is built once at bring-up and names the topology
//! (through [`MotorWiring`]) plus the PWM settings shared by the pin-level
//! variants. It is immutable once handed to the builder.
//!
//! # Example
//!
//! ```
//! use motor_hal::libraries::motor_driver::{DriverConfig, MotorKind};
//!
//! let config = DriverConfig::dual_pin(5, 6, 7).with_pwm_bits(8).with_inverted(true);
//! assert_eq!(config.wiring.kind(), MotorKind::DualPin);
//! assert!(config.validate().is_ok());
//! ```

use core::fmt;

use super::error::ConfigError;
use crate::platform::traits::{MAX_PWM_BITS, MIN_PWM_BITS, PwmConfig, SERVO_FRAME_US};

/// Default PWM carrier frequency (Hz), above the audible range
pub const DEFAULT_PWM_FREQUENCY_HZ: u32 = 20_000;

/// Default PWM resolution (bits), command range `-1023..=1023`
pub const DEFAULT_PWM_BITS: u8 = 10;

/// Per-motor construction parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverConfig {
    /// PWM carrier frequency in Hz (`0` keeps the hardware default)
    pub pwm_frequency: u32,
    /// PWM resolution in bits
    pub pwm_bits: u8,
    /// Flip the sign of every command
    pub inverted: bool,
    /// Topology and pin assignment
    pub wiring: MotorWiring,
}

impl DriverConfig {
    const fn with_wiring(wiring: MotorWiring) -> Self {
        Self {
            pwm_frequency: DEFAULT_PWM_FREQUENCY_HZ,
            pwm_bits: DEFAULT_PWM_BITS,
            inverted: false,
            wiring,
        }
    }

    /// H-bridge with a speed pin and two direction pins
    pub const fn dual_pin(pwm: u8, in_a: u8, in_b: u8) -> Self {
        Self::with_wiring(MotorWiring::DualPin { pwm, in_a, in_b })
    }

    /// Driver with a speed pin and one direction pin
    pub const fn single_pin(pwm: u8, direction: u8) -> Self {
        Self::with_wiring(MotorWiring::SinglePin { pwm, direction })
    }

    /// Two PWM-capable enable lines (`in_a` reverse, `in_b` forward)
    pub const fn half_bridge(in_a: u8, in_b: u8) -> Self {
        Self::with_wiring(MotorWiring::HalfBridge { in_a, in_b })
    }

    /// Servo-pulse ESC on one pin with the default 1000-2000 µs window
    pub const fn esc(pin: u8) -> Self {
        Self::with_wiring(MotorWiring::Esc {
            pin,
            pulse: EscConfig::DEFAULT,
        })
    }

    /// Remote motor `motor` on the shared I2C commander
    pub const fn relay(motor: u8) -> Self {
        Self::with_wiring(MotorWiring::Relay {
            motor,
            relay: RelayConfig::DEFAULT,
        })
    }

    /// Set the PWM carrier frequency (`0` keeps the hardware default)
    pub const fn with_pwm_frequency(mut self, frequency: u32) -> Self {
        self.pwm_frequency = frequency;
        self
    }

    /// Set the PWM resolution
    pub const fn with_pwm_bits(mut self, bits: u8) -> Self {
        self.pwm_bits = bits;
        self
    }

    /// Set the inversion flag
    pub const fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// PWM settings for the pin-level variants
    pub const fn pwm_config(&self) -> PwmConfig {
        PwmConfig::new(self.pwm_frequency, self.pwm_bits)
    }

    /// Check the configuration before any hardware is touched
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PWM_BITS..=MAX_PWM_BITS).contains(&self.pwm_bits) {
            return Err(ConfigError::InvalidResolution(self.pwm_bits));
        }
        match &self.wiring {
            MotorWiring::Esc { pulse, .. } => pulse.validate(),
            MotorWiring::Relay { relay, .. } => relay.validate(),
            _ => Ok(()),
        }
    }
}

/// Pin assignment per topology
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorWiring {
    DualPin { pwm: u8, in_a: u8, in_b: u8 },
    SinglePin { pwm: u8, direction: u8 },
    HalfBridge { in_a: u8, in_b: u8 },
    Esc { pin: u8, pulse: EscConfig },
    Relay { motor: u8, relay: RelayConfig },
}

impl MotorWiring {
    pub const fn kind(&self) -> MotorKind {
        match self {
            MotorWiring::DualPin { .. } => MotorKind::DualPin,
            MotorWiring::SinglePin { .. } => MotorKind::SinglePin,
            MotorWiring::HalfBridge { .. } => MotorKind::HalfBridge,
            MotorWiring::Esc { .. } => MotorKind::Esc,
            MotorWiring::Relay { .. } => MotorKind::Relay,
        }
    }
}

/// Driver topology tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorKind {
    DualPin,
    SinglePin,
    HalfBridge,
    Esc,
    Relay,
}

impl MotorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MotorKind::DualPin => "dual-pin",
            MotorKind::SinglePin => "single-pin",
            MotorKind::HalfBridge => "half-bridge",
            MotorKind::Esc => "esc",
            MotorKind::Relay => "relay",
        }
    }
}

impl fmt::Display for MotorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ESC pulse window in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EscConfig {
    /// Pulse for zero throttle
    pub neutral_us: u16,
    /// Shortest pulse written (full reverse)
    pub min_us: u16,
    /// Longest pulse written (full forward)
    pub max_us: u16,
}

impl EscConfig {
    pub const DEFAULT: Self = Self {
        neutral_us: 1500,
        min_us: 1000,
        max_us: 2000,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.min_us <= self.neutral_us && self.neutral_us <= self.max_us;
        if !ordered || u32::from(self.max_us) > SERVO_FRAME_US {
            return Err(ConfigError::InvalidPulseRange);
        }
        Ok(())
    }
}

impl Default for EscConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Relay target scaling and retry policy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayConfig {
    /// Target units per command count
    pub target_scale: f32,
    /// Targets are clamped to `±max_target`
    pub max_target: f32,
    /// Extra attempts after a failed transaction
    pub max_retries: u8,
}

impl RelayConfig {
    pub const DEFAULT: Self = Self {
        target_scale: 1.0,
        max_target: f32::MAX,
        max_retries: 2,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.target_scale) || !positive(self.max_target) {
            return Err(ConfigError::InvalidTargetScale);
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
