//! Platform abstraction layer
//!
//! Hardware-access primitives motor drivers are written against: pin modes,
//! PWM writes, PWM frequency/resolution, servo pulses and I2C transport.
//! Board code implements these traits (directly or through the
//! `embedded-hal` adapters in [`hal`]); tests use [`mock`].

pub mod error;
pub mod hal;
pub mod pwm_servo;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use pwm_servo::PwmServo;
pub use traits::{
    GpioInterface, I2cInterface, Platform, PwmInterface, ServoInterface, TimerInterface,
};
