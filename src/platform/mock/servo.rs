//! Mock servo pulse output for testing

use crate::platform::{
    Result,
    error::{PlatformError, ServoError},
    traits::{SERVO_FRAME_US, ServoInterface},
};

/// Mock servo output
///
/// Records the last pulse width. Writes before `attach()` are refused.
#[derive(Debug, Default)]
pub struct MockServo {
    attached: bool,
    pulse_us: u16,
}

impl MockServo {
    /// Create a detached mock servo
    pub fn new() -> Self {
        Self::default()
    }
}

impl ServoInterface for MockServo {
    fn attach(&mut self) -> Result<()> {
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
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
        self.pulse_us = pulse_us;
        Ok(())
    }

    fn microseconds(&self) -> u16 {
        self.pulse_us
    }
}
