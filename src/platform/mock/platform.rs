//! Mock Platform implementation for testing

use crate::platform::{
    Result,
    error::{GpioError, PlatformError},
    traits::{I2cConfig, Platform, PwmConfig},
};

use super::{MockGpio, MockI2c, MockPwm, MockServo, MockTimer};
use std::vec::Vec;

/// Mock Platform implementation
///
/// Hands out mock peripherals and enforces exclusive pin ownership across
/// GPIO, PWM and servo outputs.
///
/// # Example
///
/// ```ignore
/// use motor_hal::platform::mock::MockPlatform;
/// use motor_hal::platform::traits::Platform;
///
/// let mut platform = MockPlatform::new();
/// let _pin = platform.create_gpio(2).unwrap();
/// assert!(platform.create_gpio(2).is_err());
/// ```
#[derive(Debug)]
pub struct MockPlatform {
    timer: MockTimer,
    pins_allocated: Vec<u8>,
}

impl MockPlatform {
    /// Create a new mock platform
    pub fn new() -> Self {
        Self {
            timer: MockTimer::new(),
            pins_allocated: Vec::new(),
        }
    }

    /// Maximum number of I2C peripherals
    pub const MAX_I2CS: u8 = 2;

    /// Maximum GPIO pin number
    pub const MAX_GPIO: u8 = 29;

    /// Pins handed out so far
    pub fn pins_allocated(&self) -> &[u8] {
        &self.pins_allocated
    }

    fn claim(&mut self, pin: u8) -> Result<()> {
        if pin > Self::MAX_GPIO {
            return Err(PlatformError::Gpio(GpioError::InvalidPin));
        }
        if self.pins_allocated.contains(&pin) {
            return Err(PlatformError::Gpio(GpioError::PinInUse));
        }
        self.pins_allocated.push(pin);
        Ok(())
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    type Gpio = MockGpio;
    type Pwm = MockPwm;
    type Servo = MockServo;
    type I2c = MockI2c;
    type Timer = MockTimer;

    fn init() -> Result<Self> {
        Ok(Self::new())
    }

    fn create_gpio(&mut self, pin: u8) -> Result<Self::Gpio> {
        self.claim(pin)?;
        Ok(MockGpio::new())
    }

    fn create_pwm(&mut self, pin: u8, config: PwmConfig) -> Result<Self::Pwm> {
        self.claim(pin)?;
        Ok(MockPwm::new(config))
    }

    fn create_servo(&mut self, pin: u8) -> Result<Self::Servo> {
        self.claim(pin)?;
        Ok(MockServo::new())
    }

    fn create_i2c(&mut self, i2c_id: u8, config: I2cConfig) -> Result<Self::I2c> {
        if i2c_id >= Self::MAX_I2CS {
            return Err(PlatformError::ResourceUnavailable);
        }
        Ok(MockI2c::new(config))
    }

    fn timer_mut(&mut self) -> &mut Self::Timer {
        &mut self.timer
    }
}
