//! Relay driver for remote motor controllers
//!
//! Each driver owns its target value and pushes it to the remote controller
//! with one register write per command. The bus itself belongs to a shared
//! [`I2cCommander`] brought up once at system start.
//!
//! | Command   | Target written            |
//! |-----------|---------------------------|
//! | forward m | `+m * scale`              |
//! | reverse m | `-m * scale`              |
//! | brake     | `0.0`                     |
//!
//! Targets are clamped to `±max_target`, and the reported intensity is the
//! magnitude that target represents. A failed write is retried up to
//! `max_retries` times; when every attempt fails the driver is marked faulted
//! and the error returned. The next successful write clears the fault.

use super::{Direction, MotorError, MotorState, SignalGenerator, config::RelayConfig, error::TransportError};
use crate::core::traits::{MockState, SharedState};
use crate::libraries::i2c_commander::{I2cCommander, Register};
use crate::platform::traits::I2cInterface;

#[cfg(feature = "embassy")]
use crate::core::traits::EmbassyState;

/// Register-level access to remote motors
pub trait RegisterBus {
    /// Write `data` to `register` of remote motor `motor`
    fn write_register(&self, motor: u8, register: Register, data: &[u8]) -> Result<(), TransportError>;

    /// Transport has been brought up
    fn is_connected(&self) -> bool {
        true
    }

    /// Remote motor `motor` is registered on this transport
    fn has_motor(&self, _motor: u8) -> bool {
        true
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &T {
    fn write_register(&self, motor: u8, register: Register, data: &[u8]) -> Result<(), TransportError> {
        (**self).write_register(motor, register, data)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn has_motor(&self, motor: u8) -> bool {
        (**self).has_motor(motor)
    }
}

impl<I: I2cInterface> RegisterBus for MockState<I2cCommander<I>> {
    fn write_register(&self, motor: u8, register: Register, data: &[u8]) -> Result<(), TransportError> {
        self.with_mut(|commander| commander.write_register(motor, register, data))
    }

    fn is_connected(&self) -> bool {
        self.with(|commander| commander.is_initialized())
    }

    fn has_motor(&self, motor: u8) -> bool {
        self.with(|commander| commander.motor(motor).is_some())
    }
}

/// Each attempt holds the critical section for one `write_register` call,
/// channel select included. The bus must therefore complete transfers by
/// polling; an interrupt-driven I2C driver cannot finish inside it.
#[cfg(feature = "embassy")]
impl<I: I2cInterface> RegisterBus for EmbassyState<I2cCommander<I>> {
    fn write_register(&self, motor: u8, register: Register, data: &[u8]) -> Result<(), TransportError> {
        self.with_mut(|commander| commander.write_register(motor, register, data))
    }

    fn is_connected(&self) -> bool {
        self.with(|commander| commander.is_initialized())
    }

    fn has_motor(&self, motor: u8) -> bool {
        self.with(|commander| commander.motor(motor).is_some())
    }
}

/// Placeholder transport for builds without relay motors
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransport;

impl RegisterBus for NoTransport {
    fn write_register(&self, _motor: u8, _register: Register, _data: &[u8]) -> Result<(), TransportError> {
        Err(TransportError::Unavailable)
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn has_motor(&self, _motor: u8) -> bool {
        false
    }
}

/// One remote motor reached through a [`RegisterBus`]
pub struct RelayDriver<B: RegisterBus> {
    bus: B,
    motor: u8,
    config: RelayConfig,
    target: f32,
    direction: Direction,
    magnitude: u32,
    faulted: bool,
    failures: u32,
}

impl<B: RegisterBus> RelayDriver<B> {
    /// Bind remote motor `motor` and write a zero target
    ///
    /// A failed first write is logged and leaves the driver faulted.
    pub fn new(bus: B, motor: u8, config: RelayConfig) -> Self {
        if !bus.is_connected() {
            crate::log_warn!("Relay motor {} built before bus bring-up", motor);
        }
        let mut driver = Self {
            bus,
            motor,
            config,
            target: 0.0,
            direction: Direction::Neutral,
            magnitude: 0,
            faulted: false,
            failures: 0,
        };
        if let Err(e) = driver.brake() {
            crate::log_error!("Relay motor {} neutral write failed: {}", motor, e);
        }
        driver
    }

    /// Remote motor index on the commander
    pub fn motor(&self) -> u8 {
        self.motor
    }

    /// Last target value sent (or attempted)
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Commands that failed after all retries
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    fn command(&mut self, direction: Direction, magnitude: u32) -> Result<(), MotorError> {
        let limit = self.config.max_target;
        let scaled = magnitude as f32 * self.config.target_scale;
        let target = match direction {
            Direction::Reverse => -scaled,
            _ => scaled,
        };

        self.target = target.max(-limit).min(limit);
        self.magnitude = magnitude.min((limit / self.config.target_scale) as u32);
        self.direction = if magnitude == 0 {
            Direction::Neutral
        } else {
            direction
        };
        self.transmit()
    }

    fn transmit(&mut self) -> Result<(), MotorError> {
        let payload = self.target.to_le_bytes();
        let mut last = TransportError::Unavailable;

        for attempt in 0..=self.config.max_retries {
            match self.bus.write_register(self.motor, Register::Target, &payload) {
                Ok(()) => {
                    if self.faulted {
                        crate::log_info!("Relay motor {} recovered", self.motor);
                    }
                    self.faulted = false;
                    return Ok(());
                }
                Err(e) => {
                    crate::log_debug!("Relay motor {} attempt {} failed: {}", self.motor, attempt, e);
                    last = e;
                    if !e.is_retryable() {
                        break;
                    }
                }
            }
        }

        self.faulted = true;
        self.failures = self.failures.saturating_add(1);
        crate::log_warn!("Relay motor {} faulted: {}", self.motor, last);
        Err(MotorError::Transport(last))
    }
}

impl<B: RegisterBus> SignalGenerator for RelayDriver<B> {
    fn forward(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.command(Direction::Forward, magnitude)
    }

    fn reverse(&mut self, magnitude: u32) -> Result<(), MotorError> {
        self.command(Direction::Reverse, magnitude)
    }

    fn brake(&mut self) -> Result<(), MotorError> {
        self.command(Direction::Neutral, 0)
    }

    fn state(&self) -> MotorState {
        MotorState {
            direction: self.direction,
            intensity: self.magnitude,
            faulted: self.faulted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::i2c_commander::CommanderConfig;
    use crate::libraries::motor_driver::{Motor, MotorDriver};
    use crate::platform::error::I2cError;
    use crate::platform::mock::{MockI2c, MockTimer};
    use crate::platform::traits::I2cConfig;

    type Shared = MockState<I2cCommander<MockI2c>>;

    fn shared(address: u8, motors: u8) -> Shared {
        let mut commander = I2cCommander::new(MockI2c::new(I2cConfig::default()), CommanderConfig::default());
        commander.add_motors(address, motors).unwrap();
        commander.init(&mut MockTimer::new()).unwrap();
        commander.bus_mut().clear_transactions();
        MockState::new(commander)
    }

    fn frame(target: f32) -> Vec<u8> {
        let mut frame = vec![Register::Target.addr()];
        frame.extend_from_slice(&target.to_le_bytes());
        frame
    }

    fn writes(bus: &Shared) -> Vec<Vec<u8>> {
        bus.with(|c| c.bus().writes_to(0x60))
    }

    #[test]
    fn test_zero_target_at_boot() {
        let bus = shared(0x60, 1);
        let driver = RelayDriver::new(&bus, 0, RelayConfig::DEFAULT);

        assert_eq!(writes(&bus), vec![frame(0.0)]);
        assert_eq!(driver.target(), 0.0);
        assert_eq!(driver.state(), MotorState::NEUTRAL);
    }

    #[test]
    fn test_signed_targets() {
        let bus = shared(0x60, 1);
        let config = RelayConfig {
            target_scale: 0.5,
            ..RelayConfig::DEFAULT
        };
        let mut motor = Motor::new(RelayDriver::new(&bus, 0, config), false);

        motor.drive(100).unwrap();
        assert_eq!(motor.generator().target(), 50.0);
        motor.drive(-100).unwrap();
        assert_eq!(motor.generator().target(), -50.0);
        motor.stop().unwrap();

        assert_eq!(
            writes(&bus),
            vec![frame(0.0), frame(50.0), frame(-50.0), frame(0.0)]
        );
        assert_eq!(motor.state(), MotorState::NEUTRAL);
    }

    #[test]
    fn test_target_clamped() {
        let bus = shared(0x60, 1);
        let config = RelayConfig {
            max_target: 20.0,
            ..RelayConfig::DEFAULT
        };
        let mut driver = RelayDriver::new(&bus, 0, config);

        driver.reverse(1000).unwrap();
        assert_eq!(driver.target(), -20.0);
        assert_eq!(driver.state(), MotorState::new(Direction::Reverse, 20));

        let config = RelayConfig {
            target_scale: 0.5,
            max_target: 20.0,
            ..RelayConfig::DEFAULT
        };
        let mut driver = RelayDriver::new(&bus, 0, config);
        driver.forward(1000).unwrap();
        assert_eq!(driver.target(), 20.0);
        assert_eq!(driver.state(), MotorState::new(Direction::Forward, 40));
        driver.forward(30).unwrap();
        assert_eq!(driver.state(), MotorState::new(Direction::Forward, 30));
    }

    #[test]
    fn test_retry_then_success() {
        let bus = shared(0x60, 1);
        let mut driver = RelayDriver::new(&bus, 0, RelayConfig::DEFAULT);
        bus.with_mut(|c| {
            c.bus_mut().fail_next(I2cError::Nack);
            c.bus_mut().short_write_next(3);
        });

        driver.forward(10).unwrap();
        assert!(!driver.is_faulted());
        assert_eq!(writes(&bus).last(), Some(&frame(10.0)));
    }

    #[test]
    fn test_fault_set_and_cleared() {
        let bus = shared(0x60, 1);
        let mut driver = RelayDriver::new(&bus, 0, RelayConfig::DEFAULT);
        bus.with_mut(|c| {
            for _ in 0..3 {
                c.bus_mut().fail_next(I2cError::Timeout);
            }
        });

        assert_eq!(
            driver.forward(10),
            Err(MotorError::Transport(TransportError::Bus(I2cError::Timeout)))
        );
        assert!(driver.is_faulted());
        assert!(driver.state().faulted);
        assert_eq!(driver.failures(), 1);

        driver.forward(10).unwrap();
        assert!(!driver.is_faulted());
        assert_eq!(driver.failures(), 1);
    }

    #[test]
    fn test_attempts_are_bounded() {
        let bus = shared(0x60, 1);
        let mut driver = RelayDriver::new(&bus, 0, RelayConfig::DEFAULT);
        bus.with_mut(|c| {
            c.bus_mut().clear_transactions();
            for _ in 0..4 {
                c.bus_mut().short_write_next(1);
            }
        });

        assert_eq!(
            driver.forward(10),
            Err(MotorError::Transport(TransportError::ShortWrite {
                expected: 5,
                written: 1
            }))
        );
        // max_retries = 2: three truncated frames, the fourth script entry untouched
        assert_eq!(writes(&bus), vec![vec![0x01]; 3]);
        assert_eq!(bus.with_mut(|c| c.bus_mut().write(0x60, &[0; 5])), Ok(1));
    }

    #[test]
    fn test_non_retryable_error_fails_fast() {
        let bus = shared(0x60, 1);
        let mut driver = RelayDriver::new(&bus, 5, RelayConfig::DEFAULT);
        assert!(driver.is_faulted());

        assert_eq!(
            driver.forward(1),
            Err(MotorError::Transport(TransportError::UnknownMotor(5)))
        );
        assert_eq!(driver.failures(), 2);
        assert!(writes(&bus).is_empty());
    }

    #[test]
    fn test_boot_failure_leaves_driver_faulted() {
        let bus = shared(0x60, 1);
        bus.with_mut(|c| c.bus_mut().set_absent(0x60));

        let driver = RelayDriver::new(&bus, 0, RelayConfig::DEFAULT);
        assert!(driver.is_faulted());
        assert_eq!(driver.target(), 0.0);
    }

    #[test]
    fn test_drivers_share_one_bring_up() {
        let bus = shared(0x60, 2);
        let mut left = Motor::new(RelayDriver::new(&bus, 0, RelayConfig::DEFAULT), false);
        let mut right = Motor::new(RelayDriver::new(&bus, 1, RelayConfig::DEFAULT), true);
        bus.with_mut(|c| c.bus_mut().clear_transactions());

        left.drive(4).unwrap();
        right.drive(4).unwrap();
        right.drive(8).unwrap();

        assert_eq!(
            writes(&bus),
            vec![
                vec![0x7F, 0],
                frame(4.0),
                vec![0x7F, 1],
                frame(-4.0),
                frame(-8.0),
            ]
        );
        assert!(bus.with(|c| c.is_initialized()));
    }

    #[test]
    fn test_no_transport() {
        let mut driver = RelayDriver::new(NoTransport, 0, RelayConfig::DEFAULT);
        assert!(driver.is_faulted());
        assert_eq!(
            driver.brake(),
            Err(MotorError::Transport(TransportError::Unavailable))
        );
    }
}
