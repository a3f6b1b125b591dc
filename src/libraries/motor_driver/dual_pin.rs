//! Dual-pin H-bridge driver
//!
//! One PWM pin sets intensity, two digital pins select direction
//! (L298N / TB6612 style wiring).
//!
//! ## Truth Table
//!
//! | IN_A | IN_B | PWM | Motor State                 |
//! |------|------|-----|-----------------------------|
//! | 1    | 0    | m   | Forward                     |
//! | 0    | 1    | m   | Reverse                     |
//! | x    | x    | 0   | Coast (direction pins kept) |

use super::{
    Direction, MotorError, MotorState, SignalGenerator, configure_output, configure_pwm,
    write_intensity,
};
use crate::platform::traits::{GpioInterface, PwmConfig, PwmInterface};

/// H-bridge driven by a PWM pin and two direction pins
///
/// # Type Parameters
///
/// * `P` - PWM channel for the intensity line
/// * `A` - Direction input A (high for forward)
/// * `B` - Direction input B (high for reverse)
pub struct DualPinDriver<P, A, B>
where
    P: PwmInterface,
    A: GpioInterface,
    B: GpioInterface,
{
    pwm: P,
    in_a: A,
    in_b: B,
}

impl<P, A, B> DualPinDriver<P, A, B>
where
    P: PwmInterface,
    A: GpioInterface,
    B: GpioInterface,
{
    /// Configure all three pins and write zero intensity
    ///
    /// Frequency and resolution are programmed best effort: a rejected
    /// setting is logged and the hardware default kept.
    pub fn new(config: PwmConfig, mut pwm: P, mut in_a: A, mut in_b: B) -> Self {
        configure_output(&mut in_a);
        configure_output(&mut in_b);
        configure_pwm(&mut pwm, config);

        let mut driver = Self { pwm, in_a, in_b };
        if let Err(e) = driver.brake() {
            crate::log_error!("Dual-pin neutral write failed: {}", e);
        }
        driver
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    pub fn in_a(&self) -> &A {
        &self.in_a
    }

    pub fn in_b(&self) -> &B {
        &self.in_b
    }

    /// Release the pins
    pub fn free(self) -> (P, A, B) {
        (self.pwm, self.in_a, self.in_b)
    }
}

impl<P, A, B> SignalGenerator for DualPinDriver<P, A, B>
where
    P: PwmInterface,
    A: GpioInterface,
    B: GpioInterface,
{
    #[inline]
    fn forward(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.in_a.set_high()?;
        self.in_b.set_low()?;
        write_intensity(&mut self.pwm, magnitude)
    }

    #[inline]
    fn reverse(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.in_a.set_low()?;
        self.in_b.set_high()?;
        write_intensity(&mut self.pwm, magnitude)
    }

    #[inline]
    fn brake(&mut self) -> Result<(), MotorError> {
        self.pwm.set_duty_cycle(0)?;
        Ok(())
    }

    fn state(&self) -> MotorState {
        let intensity = u32::from(self.pwm.duty_cycle());
        let direction = match (intensity, self.in_a.read(), self.in_b.read()) {
            (0, _, _) => Direction::Neutral,
            (_, true, false) => Direction::Forward,
            (_, false, true) => Direction::Reverse,
            _ => Direction::Neutral,
        };
        MotorState::new(direction, intensity)
    }
}
