//! Single-pin direction driver
//!
//! The driver IC infers direction from one digital level and takes intensity
//! on a separate PWM line (DRV8871 PH/EN, Cytron MDD style).

use super::{
    Direction, MotorError, MotorState, SignalGenerator, configure_output, configure_pwm,
    write_intensity,
};
use crate::platform::traits::{GpioInterface, PwmConfig, PwmInterface};

/// PWM intensity pin plus one direction pin (high = forward)
pub struct SinglePinDriver<P, D>
where
    P: PwmInterface,
    D: GpioInterface,
{
    pwm: P,
    direction: D,
}

impl<P, D> SinglePinDriver<P, D>
where
    P: PwmInterface,
    D: GpioInterface,
{
    /// Configure both pins and write zero intensity
    pub fn new(config: PwmConfig, mut pwm: P, mut direction: D) -> Self {
        configure_output(&mut direction);
        configure_pwm(&mut pwm, config);

        let mut driver = Self { pwm, direction };
        if let Err(e) = driver.brake() {
            crate::log_error!("Single-pin neutral write failed: {}", e);
        }
        driver
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    pub fn direction_pin(&self) -> &D {
        &self.direction
    }

    /// Release the pins
    pub fn free(self) -> (P, D) {
        (self.pwm, self.direction)
    }
}

impl<P, D> SignalGenerator for SinglePinDriver<P, D>
where
    P: PwmInterface,
    D: GpioInterface,
{
    #[inline]
    fn forward(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.direction.set_high()?;
        write_intensity(&mut self.pwm, magnitude)
    }

    #[inline]
    fn reverse(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.direction.set_low()?;
        write_intensity(&mut self.pwm, magnitude)
    }

    #[inline]
    fn brake(&mut self) -> Result<(), MotorError> {
        self.pwm.set_duty_cycle(0)?;
        Ok(())
    }

    fn state(&self) -> MotorState {
        let intensity = u32::from(self.pwm.duty_cycle());
        let direction = if intensity == 0 {
            Direction::Neutral
        } else if self.direction.read() {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        MotorState::new(direction, intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockGpio, MockPwm};
    use crate::platform::traits::GpioMode;

    fn driver(frequency: u32) -> SinglePinDriver<MockPwm, MockGpio> {
        SinglePinDriver::new(
            PwmConfig::new(frequency, 8),
            MockPwm::new(PwmConfig::new(490, 8)),
            MockGpio::new(),
        )
    }

    #[test]
    fn test_construction() {
        let driver = driver(0);
        assert_eq!(driver.direction_pin().mode(), GpioMode::OutputPushPull);
        // Zero frequency keeps the hardware default
        assert_eq!(driver.pwm().frequency(), 490);
        assert_eq!(driver.pwm().duty_cycle(), 0);
        assert_eq!(driver.state(), MotorState::NEUTRAL);
    }

    #[test]
    fn test_forward_and_reverse() {
        let mut driver = driver(20_000);
        assert_eq!(driver.pwm().frequency(), 20_000);

        driver.forward(80).unwrap();
        assert!(driver.direction_pin().read());
        assert_eq!(driver.state(), MotorState::new(Direction::Forward, 80));

        driver.reverse(80).unwrap();
        assert!(!driver.direction_pin().read());
        assert_eq!(driver.state(), MotorState::new(Direction::Reverse, 80));
    }

    #[test]
    fn test_brake() {
        let mut driver = driver(0);
        driver.forward(255).unwrap();
        driver.brake().unwrap();

        assert_eq!(driver.pwm().duty_cycle(), 0);
        assert!(driver.direction_pin().read());

        let (pwm, direction) = driver.free();
        assert_eq!(pwm.duty_cycle(), 0);
        assert!(direction.read());
    }
}
