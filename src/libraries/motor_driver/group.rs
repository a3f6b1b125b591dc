//! Motor groups
//!
//! Commands a fixed set of motors together, e.g. the four wheels of a skid
//! steer rover. Every motor is commanded even if an earlier one fails, so one
//! faulted relay cannot leave the rest of the drivetrain running.

use super::{MotorDriver, MotorError};

/// Fixed-size group of motors
///
/// # Example
///
/// ```ignore
/// let mut wheels = MotorGroup::new([front_left, rear_left, front_right, rear_right]);
///
/// // Turn right: left side forward, right side reverse
/// wheels.drive_all(&[200, 200, -200, -200])?;
/// wheels.stop_all()?;
/// ```
pub struct MotorGroup<M: MotorDriver, const N: usize> {
    motors: [M; N],
}

impl<M: MotorDriver, const N: usize> MotorGroup<M, N> {
    pub fn new(motors: [M; N]) -> Self {
        Self { motors }
    }

    /// Drive motor `i` with `commands[i]`
    ///
    /// # Errors
    ///
    /// Returns the first motor error after all motors have been commanded.
    #[inline]
    pub fn drive_all(&mut self, commands: &[i32; N]) -> Result<(), MotorError> {
        let mut result = Ok(());
        for (motor, &command) in self.motors.iter_mut().zip(commands.iter()) {
            if let Err(e) = motor.drive(command) {
                result = result.and(Err(e));
            }
        }
        result
    }

    /// Stop every motor
    ///
    /// # Errors
    ///
    /// Returns the first motor error after all motors have been stopped.
    #[inline]
    pub fn stop_all(&mut self) -> Result<(), MotorError> {
        let mut result = Ok(());
        for motor in self.motors.iter_mut() {
            if let Err(e) = motor.stop() {
                result = result.and(Err(e));
            }
        }
        result
    }

    /// True if any motor reports a fault
    pub fn any_faulted(&self) -> bool {
        self.motors.iter().any(|m| m.is_faulted())
    }

    pub fn get(&self, index: usize) -> Option<&M> {
        self.motors.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut M> {
        self.motors.get_mut(index)
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn into_inner(self) -> [M; N] {
        self.motors
    }
}
