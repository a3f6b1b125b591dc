//! Servo pulse output on top of a PWM channel
//!
//! For a 50 Hz frame (20 ms period):
//! - 1000 μs = 5.0% duty
//! - 1500 μs = 7.5% duty
//! - 2000 μs = 10.0% duty

use crate::platform::{
    Result,
    error::{PlatformError, PwmError, ServoError},
    traits::{PwmInterface, SERVO_FRAME_HZ, SERVO_FRAME_US, ServoInterface},
};

/// Servo output driven by any [`PwmInterface`]
pub struct PwmServo<P: PwmInterface> {
    pwm: P,
    pulse_us: u16,
    attached: bool,
}

impl<P: PwmInterface> PwmServo<P> {
    /// Wrap a PWM channel (detached until [`ServoInterface::attach`])
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            pulse_us: 0,
            attached: false,
        }
    }

    /// Borrow the underlying channel
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Give the PWM channel back
    pub fn free(self) -> P {
        self.pwm
    }
}

/// Convert a pulse width to raw duty counts for a channel whose full scale is
/// `max_duty`
pub fn pulse_to_duty(pulse_us: u16, max_duty: u16) -> u16 {
    let counts = u32::from(pulse_us) * (u32::from(max_duty) + 1) / SERVO_FRAME_US;
    counts.min(u32::from(max_duty)) as u16
}

impl<P: PwmInterface> ServoInterface for PwmServo<P> {
    fn attach(&mut self) -> Result<()> {
        match self.pwm.set_frequency(SERVO_FRAME_HZ) {
            Ok(()) => {}
            // Timer already set up for servo frames by the board
            Err(PlatformError::Pwm(PwmError::InvalidFrequency)) => {
                crate::log_warn!("Servo frame rate left to board timer setup");
            }
            Err(e) => return Err(e),
        }
        self.pwm.enable();
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.pwm.disable();
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn write_microseconds(&mut self, pulse_us: u16) -> Result<()> {
        if !self.attached {
            return Err(PlatformError::Servo(ServoError::NotAttached));
        }
        if u32::from(pulse_us) > SERVO_FRAME_US {
            return Err(PlatformError::Servo(ServoError::InvalidPulse));
        }
        let duty = pulse_to_duty(pulse_us, self.pwm.max_duty_cycle());
        self.pwm.set_duty_cycle(duty)?;
        self.pulse_us = pulse_us;
        Ok(())
    }

    fn microseconds(&self) -> u16 {
        self.pulse_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPwm;
    use crate::platform::traits::PwmConfig;

    #[test]
    fn test_pulse_to_duty_16_bit() {
        assert_eq!(pulse_to_duty(1500, u16::MAX), 4915);
        assert_eq!(pulse_to_duty(1000, u16::MAX), 3276);
        assert_eq!(pulse_to_duty(2000, u16::MAX), 6553);
    }

    #[test]
    fn test_pulse_to_duty_saturates_at_full_frame() {
        assert_eq!(pulse_to_duty(20_000, 255), 255);
    }

    #[test]
    fn test_pwm_servo_attach_sets_frame_rate() {
        let mut servo = PwmServo::new(MockPwm::new(PwmConfig::new(0, 16)));
        assert!(servo.write_microseconds(1500).is_err());

        servo.attach().unwrap();
        assert!(servo.pwm().is_enabled());
        assert_eq!(servo.pwm().frequency(), 50);

        servo.write_microseconds(1500).unwrap();
        assert_eq!(servo.microseconds(), 1500);
        assert_eq!(servo.pwm().duty_cycle(), 4915);
    }

    #[test]
    fn test_pwm_servo_detach() {
        let mut servo = PwmServo::new(MockPwm::default());
        servo.attach().unwrap();
        servo.detach();
        assert!(!servo.is_attached());
        assert!(!servo.free().is_enabled());
    }
}
