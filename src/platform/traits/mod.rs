//! Platform abstraction traits
//!
//! The hardware-access primitives motor drivers are written against.

pub mod gpio;
pub mod i2c;
pub mod platform;
pub mod pwm;
pub mod servo;
pub mod timer;

// Re-export trait interfaces
pub use gpio::{GpioInterface, GpioMode};
pub use i2c::{I2cConfig, I2cInterface};
pub use platform::Platform;
pub use pwm::{MAX_PWM_BITS, MIN_PWM_BITS, PwmConfig, PwmInterface, max_duty_for_bits};
pub use servo::{SERVO_FRAME_HZ, SERVO_FRAME_US, ServoInterface};
pub use timer::TimerInterface;
