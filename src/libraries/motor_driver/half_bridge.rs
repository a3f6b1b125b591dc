//! Half-bridge pair driver
//!
//! Each of two PWM lines carries both "enable this direction" and "how hard"
//! (BTS7960 RPWM/LPWM style). At most one line is nonzero at a time.
//!
//! | IN_A (reverse) | IN_B (forward) | Motor State |
//! |----------------|----------------|-------------|
//! | 0              | m              | Forward     |
//! | m              | 0              | Reverse     |
//! | 0              | 0              | Stopped     |

use super::{Direction, MotorError, MotorState, SignalGenerator, configure_pwm, write_intensity};
use crate::platform::traits::{PwmConfig, PwmInterface};

/// Two PWM enable lines, `in_a` drives reverse and `in_b` drives forward
pub struct HalfBridgeDriver<A, B>
where
    A: PwmInterface,
    B: PwmInterface,
{
    in_a: A,
    in_b: B,
}

impl<A, B> HalfBridgeDriver<A, B>
where
    A: PwmInterface,
    B: PwmInterface,
{
    /// Configure both lines (carrier on both when nonzero) and zero them
    pub fn new(config: PwmConfig, mut in_a: A, mut in_b: B) -> Self {
        configure_pwm(&mut in_a, config);
        configure_pwm(&mut in_b, config);

        let mut driver = Self { in_a, in_b };
        if let Err(e) = driver.brake() {
            crate::log_error!("Half-bridge neutral write failed: {}", e);
        }
        driver
    }

    /// Same as [`new`](Self::new), keeping the dual-pin argument shape
    ///
    /// The first pin argument is ignored.
    pub fn with_placeholder<U>(config: PwmConfig, _unused: U, in_a: A, in_b: B) -> Self {
        Self::new(config, in_a, in_b)
    }

    pub fn reverse_pin(&self) -> &A {
        &self.in_a
    }

    pub fn forward_pin(&self) -> &B {
        &self.in_b
    }

    /// Release the pins
    pub fn free(self) -> (A, B) {
        (self.in_a, self.in_b)
    }
}

impl<A, B> SignalGenerator for HalfBridgeDriver<A, B>
where
    A: PwmInterface,
    B: PwmInterface,
{
    #[inline]
    fn forward(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.in_a.set_duty_cycle(0)?;
        write_intensity(&mut self.in_b, magnitude)
    }

    #[inline]
    fn reverse(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.in_b.set_duty_cycle(0)?;
        write_intensity(&mut self.in_a, magnitude)
    }

    #[inline]
    fn brake(&mut self) -> Result<(), MotorError> {
        self.in_a.set_duty_cycle(0)?;
        self.in_b.set_duty_cycle(0)?;
        Ok(())
    }

    fn state(&self) -> MotorState {
        let reverse = u32::from(self.in_a.duty_cycle());
        let forward = u32::from(self.in_b.duty_cycle());
        if forward > 0 {
            MotorState::new(Direction::Forward, forward)
        } else if reverse > 0 {
            MotorState::new(Direction::Reverse, reverse)
        } else {
            MotorState::NEUTRAL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPwm;

    fn driver() -> HalfBridgeDriver<MockPwm, MockPwm> {
        HalfBridgeDriver::new(PwmConfig::new(20_000, 8), MockPwm::default(), MockPwm::default())
    }

    #[test]
    fn test_construction_programs_both_lines() {
        let driver = driver();
        for pwm in [driver.reverse_pin(), driver.forward_pin()] {
            assert_eq!(pwm.frequency(), 20_000);
            assert!(pwm.is_enabled());
            assert_eq!(pwm.duty_cycle(), 0);
        }
    }

    #[test]
    fn test_forward_zeroes_reverse_line_first() {
        let mut driver = driver();
        driver.reverse(40).unwrap();
        driver.forward(50).unwrap();

        assert_eq!(driver.reverse_pin().duty_cycle(), 0);
        assert_eq!(driver.forward_pin().duty_cycle(), 50);
        assert_eq!(driver.state(), MotorState::new(Direction::Forward, 50));
    }

    #[test]
    fn test_reverse() {
        let mut driver = driver();
        driver.forward(50).unwrap();
        driver.reverse(50).unwrap();

        assert_eq!(driver.forward_pin().duty_cycle(), 0);
        assert_eq!(driver.reverse_pin().duty_cycle(), 50);
        assert_eq!(driver.state(), MotorState::new(Direction::Reverse, 50));
    }

    #[test]
    fn test_brake_zeroes_both() {
        let mut driver = driver();
        driver.forward(255).unwrap();
        driver.brake().unwrap();
        assert_eq!(driver.state(), MotorState::NEUTRAL);
    }

    #[test]
    fn test_constructors_behave_identically() {
        let config = PwmConfig::new(0, 10);
        let mut plain = HalfBridgeDriver::new(config, MockPwm::default(), MockPwm::default());
        let mut shaped =
            HalfBridgeDriver::with_placeholder(config, 0u8, MockPwm::default(), MockPwm::default());

        plain.reverse(700).unwrap();
        shaped.reverse(700).unwrap();
        assert_eq!(plain.state(), shaped.state());

        let (a, b) = shaped.free();
        assert_eq!(a.max_duty_cycle(), 1023);
        assert_eq!(b.duty_cycle(), 0);
    }
}
