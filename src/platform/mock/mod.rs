//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use motor_hal::platform::mock::MockPlatform;
//! use motor_hal::platform::traits::{Platform, PwmConfig, PwmInterface};
//!
//! let mut platform = MockPlatform::new();
//! let mut pwm = platform.create_pwm(3, PwmConfig::new(0, 8)).unwrap();
//! pwm.set_duty_cycle(200).unwrap();
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod i2c;
mod platform;
mod pwm;
mod servo;
mod timer;

pub use gpio::MockGpio;
pub use i2c::{I2cTransaction, MockI2c};
pub use platform::MockPlatform;
pub use pwm::MockPwm;
pub use servo::MockServo;
pub use timer::MockTimer;
