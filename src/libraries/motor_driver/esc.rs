//! Servo-pulse ESC driver
//!
//! The ESC reads a pulse width centred on a neutral value. Deviation above
//! neutral is forward throttle, below is reverse. Most ESCs treat a missing
//! signal as a fault and arm only after seeing neutral, so the constructor
//! writes it immediately.

use super::{Direction, MotorError, MotorState, SignalGenerator, config::EscConfig};
use crate::platform::traits::ServoInterface;

/// ESC on a servo pulse output
pub struct EscDriver<S: ServoInterface> {
    servo: S,
    pulse: EscConfig,
}

impl<S: ServoInterface> EscDriver<S> {
    /// Attach the output and write the neutral pulse
    pub fn new(mut servo: S, pulse: EscConfig) -> Self {
        if let Err(e) = servo.attach() {
            crate::log_error!("ESC attach failed: {}", e);
        }
        let mut driver = Self { servo, pulse };
        if let Err(e) = driver.brake() {
            crate::log_error!("ESC neutral pulse failed: {}", e);
        }
        driver
    }

    pub fn servo(&self) -> &S {
        &self.servo
    }

    pub fn pulse_config(&self) -> &EscConfig {
        &self.pulse
    }

    /// Release the servo output
    pub fn free(self) -> S {
        self.servo
    }

    fn write_offset(&mut self, offset: i64) -> Result<(), MotorError> {
        let pulse = (i64::from(self.pulse.neutral_us) + offset)
            .max(i64::from(self.pulse.min_us))
            .min(i64::from(self.pulse.max_us));
        self.servo.write_microseconds(pulse as u16)?;
        Ok(())
    }
}

impl<S: ServoInterface> SignalGenerator for EscDriver<S> {
    #[inline]
    fn forward(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.write_offset(i64::from(magnitude))
    }

    #[inline]
    fn reverse(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.write_offset(-i64::from(magnitude))
    }

    #[inline]
    fn brake(&mut self) -> Result<(), MotorError> {
        self.servo.write_microseconds(self.pulse.neutral_us)?;
        Ok(())
    }

    fn state(&self) -> MotorState {
        let pulse = self.servo.microseconds();
        let neutral = self.pulse.neutral_us;
        let mut state = if pulse > neutral {
            MotorState::new(Direction::Forward, u32::from(pulse - neutral))
        } else if pulse < neutral {
            MotorState::new(Direction::Reverse, u32::from(neutral - pulse))
        } else {
            MotorState::NEUTRAL
        };
        state.faulted = !self.servo.is_attached();
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PwmServo;
    use crate::platform::mock::{MockPwm, MockServo};
    use crate::platform::traits::{PwmConfig, PwmInterface};

    #[test]
    fn test_neutral_at_boot() {
        let driver = EscDriver::new(MockServo::new(), EscConfig::DEFAULT);
        assert!(driver.servo().is_attached());
        assert_eq!(driver.servo().microseconds(), 1500);
        assert_eq!(driver.state(), MotorState::NEUTRAL);
    }

    #[test]
    fn test_forward_and_reverse_offsets() {
        let mut driver = EscDriver::new(MockServo::new(), EscConfig::DEFAULT);

        driver.forward(200).unwrap();
        assert_eq!(driver.servo().microseconds(), 1700);
        assert_eq!(driver.state(), MotorState::new(Direction::Forward, 200));

        driver.reverse(200).unwrap();
        assert_eq!(driver.servo().microseconds(), 1300);
        assert_eq!(driver.state(), MotorState::new(Direction::Reverse, 200));
    }

    #[test]
    fn test_pulse_clamped_to_window() {
        let mut driver = EscDriver::new(MockServo::new(), EscConfig::DEFAULT);

        driver.forward(1023).unwrap();
        assert_eq!(driver.servo().microseconds(), 2000);

        driver.reverse(u32::MAX).unwrap();
        assert_eq!(driver.servo().microseconds(), 1000);
    }

    #[test]
    fn test_custom_neutral() {
        let pulse = EscConfig {
            neutral_us: 1480,
            min_us: 1100,
            max_us: 1900,
        };
        let mut driver = EscDriver::new(MockServo::new(), pulse);
        assert_eq!(driver.servo().microseconds(), 1480);

        driver.forward(20).unwrap();
        assert_eq!(driver.servo().microseconds(), 1500);

        driver.brake().unwrap();
        assert_eq!(driver.servo().microseconds(), 1480);
    }

    #[test]
    fn test_detached_output_reports_fault() {
        let mut servo = MockServo::new();
        servo.attach().unwrap();
        let mut driver = EscDriver::new(servo, EscConfig::DEFAULT);
        driver.servo.detach();

        assert!(driver.state().faulted);
        assert!(matches!(driver.forward(10), Err(MotorError::Platform(_))));
    }

    #[test]
    fn test_over_pwm_servo() {
        let servo = PwmServo::new(MockPwm::new(PwmConfig::new(0, 16)));
        let mut driver = EscDriver::new(servo, EscConfig::DEFAULT);
        assert_eq!(driver.servo().pwm().duty_cycle(), 4915);

        driver.forward(500).unwrap();
        assert_eq!(driver.servo().pwm().duty_cycle(), 6553);

        let pwm = driver.free().free();
        assert_eq!(pwm.frequency(), 50);
    }
}
