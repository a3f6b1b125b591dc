//! Timer interface trait
//!
//! Only bring-up code waits; the drive/stop path never calls into a timer.

use crate::platform::Result;

/// Blocking delays and a monotonic clock
pub trait TimerInterface {
    /// Block for at least `us` microseconds
    fn delay_us(&mut self, us: u32) -> Result<()>;

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32) -> Result<()> {
        self.delay_us(ms.saturating_mul(1000))
    }

    /// Monotonic timestamp in microseconds since platform initialization
    fn now_us(&self) -> u64;

    /// Monotonic timestamp in milliseconds since platform initialization
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}
