//! Root platform trait
//!
//! Aggregates the peripheral interfaces motor drivers are built from.

use super::{GpioInterface, I2cConfig, I2cInterface, PwmConfig, PwmInterface, ServoInterface, TimerInterface};
use crate::platform::Result;

/// Root platform trait
///
/// Platform implementations provide concrete types for each peripheral interface
/// via associated types, so drivers built from a platform are monomorphized.
///
/// Every `create_*` call hands out exclusive ownership of the pin: a pin
/// handed out once is refused afterwards.
///
/// # Example
///
/// ```ignore
/// impl Platform for Rp2350Platform {
///     type Gpio = HalOutput<Output<'static>>;
///     type Pwm = HalPwm<PwmOutput<'static>>;
///     // ...
/// }
/// ```
pub trait Platform: Sized {
    /// Digital output type
    type Gpio: GpioInterface;

    /// PWM channel type
    type Pwm: PwmInterface;

    /// Servo pulse output type
    type Servo: ServoInterface;

    /// I2C bus type
    type I2c: I2cInterface;

    /// Timer type
    type Timer: TimerInterface;

    /// Initialize the platform
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InitializationFailed` if initialization fails.
    fn init() -> Result<Self>;

    /// Claim a pin as a digital output
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio(GpioError::PinInUse)` if the pin is
    /// already owned, `GpioError::InvalidPin` if it does not exist.
    fn create_gpio(&mut self, pin: u8) -> Result<Self::Gpio>;

    /// Claim a pin as a PWM output
    ///
    /// The returned channel is disabled; the driver enables it.
    fn create_pwm(&mut self, pin: u8, config: PwmConfig) -> Result<Self::Pwm>;

    /// Claim a pin as a servo pulse output (detached)
    fn create_servo(&mut self, pin: u8) -> Result<Self::Servo>;

    /// Claim an I2C bus
    fn create_i2c(&mut self, i2c_id: u8, config: I2cConfig) -> Result<Self::I2c>;

    /// Get mutable timer instance
    fn timer_mut(&mut self) -> &mut Self::Timer;
}
