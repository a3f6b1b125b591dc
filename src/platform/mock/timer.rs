//! Mock Timer implementation for testing

use crate::platform::{Result, traits::TimerInterface};

/// Mock Timer implementation
///
/// Delays advance a simulated clock instead of sleeping, so bring-up retry
/// loops run instantly and tests can assert on the time they would have taken.
#[derive(Debug, Default)]
pub struct MockTimer {
    now_us: u64,
    delays: u32,
}

impl MockTimer {
    /// Create a new mock timer at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of delay calls made so far
    pub fn delays(&self) -> u32 {
        self.delays
    }
}

impl TimerInterface for MockTimer {
    fn delay_us(&mut self, us: u32) -> Result<()> {
        self.now_us = self.now_us.wrapping_add(u64::from(us));
        self.delays += 1;
        Ok(())
    }

    fn now_us(&self) -> u64 {
        self.now_us
    }
}
