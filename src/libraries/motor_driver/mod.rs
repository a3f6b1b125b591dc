//! Motor driver abstraction
//!
//! Translates one signed command into the signal sequence of a concrete
//! driver topology, so motion code issues `drive(x)` / `stop()` without knowing
//! which chip is wired to which pins.
//!
//! ## Layers
//!
//! - [`SignalGenerator`]: per-topology forward / reverse / brake
//! - [`Motor`]: inversion and sign-to-direction dispatch over one generator
//! - [`MotorDriver`]: the caller-facing `drive` / `stop` contract
//!
//! ## Topologies
//!
//! | Driver               | Pins                         | Brake             |
//! |----------------------|------------------------------|-------------------|
//! | [`DualPinDriver`]    | PWM + direction A/B          | PWM 0 (coast)     |
//! | [`SinglePinDriver`]  | PWM + one direction pin      | PWM 0 (coast)     |
//! | [`HalfBridgeDriver`] | two PWM enable lines         | both lines 0      |
//! | [`EscDriver`]        | servo pulse                  | neutral pulse     |
//! | [`RelayDriver`]      | I2C register writes          | zero target       |
//!
//! ## Example
//!
//! ```ignore
//! use motor_hal::libraries::motor_driver::{DriverConfig, MotorBuilder, MotorDriver};
//!
//! let mut builder = MotorBuilder::new(&mut platform);
//! let mut left = builder.build(&DriverConfig::dual_pin(2, 3, 4).with_pwm_bits(8))?;
//!
//! left.drive(120)?;  // forward, duty 120/255
//! left.drive(-120)?; // reverse
//! left.stop()?;      // PWM 0
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

pub mod any;
pub mod config;
pub mod dual_pin;
pub mod error;
pub mod esc;
pub mod group;
pub mod half_bridge;
pub mod relay;
pub mod single_pin;

// Re-export main types
pub use any::{AnyDriver, MotorBuilder};
pub use config::{
    DEFAULT_PWM_BITS, DEFAULT_PWM_FREQUENCY_HZ, DriverConfig, EscConfig, MotorKind, MotorWiring,
    RelayConfig,
};
pub use dual_pin::DualPinDriver;
pub use error::{ConfigError, MotorError, TransportError};
pub use esc::EscDriver;
pub use group::MotorGroup;
pub use half_bridge::HalfBridgeDriver;
pub use relay::{NoTransport, RegisterBus, RelayDriver};
pub use single_pin::SinglePinDriver;

use crate::platform::traits::{GpioInterface, GpioMode, PwmConfig, PwmInterface};

/// Counter for sampling drive logs (every 100th call)
static DRIVE_LOG_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Direction a motor is currently driven in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
    Neutral,
}

/// Snapshot of a driver's output, read back from the hardware it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorState {
    pub direction: Direction,
    /// Commanded intensity in driver units (duty counts, µs off neutral, ...)
    pub intensity: u32,
    /// Last transaction failed (relay only)
    pub faulted: bool,
}

impl MotorState {
    pub const NEUTRAL: Self = Self {
        direction: Direction::Neutral,
        intensity: 0,
        faulted: false,
    };

    pub const fn new(direction: Direction, intensity: u32) -> Self {
        Self {
            direction,
            intensity,
            faulted: false,
        }
    }

    /// No drive applied
    pub const fn is_neutral(&self) -> bool {
        self.intensity == 0
    }
}

/// Per-topology signal sequences
///
/// Implementations must leave the hardware neutral before their constructor
/// returns. Magnitudes are unsigned; [`Motor`] has already resolved the sign.
pub trait SignalGenerator {
    /// Drive forward at `magnitude`
    fn forward(&mut self, magnitude: u32) -> Result<(), MotorError>;

    /// Drive in reverse at `magnitude`
    fn reverse(&mut self, magnitude: u32) -> Result<(), MotorError>;

    /// Bring the output to its neutral state
    fn brake(&mut self) -> Result<(), MotorError>;

    /// Read back the current output
    fn state(&self) -> MotorState;
}

/// Caller-facing motor contract
///
/// Commands are signed: positive is forward, negative is reverse, `0` is
/// neutral at zero intensity. `stop()` is the explicit neutral request and is
/// valid at any time, including before the first `drive`.
pub trait MotorDriver {
    /// Apply a signed command
    fn drive(&mut self, command: i32) -> Result<(), MotorError>;

    /// Return to neutral regardless of inversion or history
    fn stop(&mut self) -> Result<(), MotorError>;

    /// Current output snapshot
    fn state(&self) -> MotorState;

    /// True while the driver reports a transport fault
    fn is_faulted(&self) -> bool {
        self.state().faulted
    }
}

/// Inversion and sign dispatch over one [`SignalGenerator`]
///
/// This is the only place a signed command is split into direction and
/// magnitude.
pub struct Motor<G: SignalGenerator> {
    generator: G,
    inverted: bool,
}

impl<G: SignalGenerator> Motor<G> {
    /// Wrap a generator; no hardware side effects
    pub fn new(generator: G, inverted: bool) -> Self {
        Self {
            generator,
            inverted,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut G {
        &mut self.generator
    }

    pub fn into_inner(self) -> G {
        self.generator
    }
}

impl<G: SignalGenerator> MotorDriver for Motor<G> {
    #[inline]
    fn drive(&mut self, command: i32) -> Result<(), MotorError> {
        let command = if self.inverted {
            command.saturating_neg()
        } else {
            command
        };

        let count = DRIVE_LOG_COUNTER.fetch_add(1, Ordering::Relaxed);
        if count.is_multiple_of(100) {
            crate::log_debug!("Motor drive: {}", command);
        }

        if command < 0 {
            self.generator.reverse(command.unsigned_abs())
        } else {
            self.generator.forward(command.unsigned_abs())
        }
    }

    #[inline]
    fn stop(&mut self) -> Result<(), MotorError> {
        self.generator.brake()
    }

    fn state(&self) -> MotorState {
        self.generator.state()
    }
}

/// Put a pin into push-pull output mode (best effort)
pub(crate) fn configure_output<G: GpioInterface>(pin: &mut G) {
    if let Err(e) = pin.set_mode(GpioMode::OutputPushPull) {
        crate::log_warn!("Output mode rejected: {}", e);
    }
}

/// Program resolution and carrier, zero the duty, then enable (best effort)
pub(crate) fn configure_pwm<P: PwmInterface>(pwm: &mut P, config: PwmConfig) {
    if let Err(e) = pwm.set_resolution(config.resolution_bits) {
        crate::log_warn!("PWM resolution {} bits rejected: {}", config.resolution_bits, e);
    }
    if config.frequency > 0 {
        if let Err(e) = pwm.set_frequency(config.frequency) {
            crate::log_warn!("PWM frequency {} Hz rejected: {}", config.frequency, e);
        }
    }
    if let Err(e) = pwm.set_duty_cycle(0) {
        crate::log_warn!("PWM zero duty rejected: {}", e);
    }
    pwm.enable();
}

/// Write `magnitude` clamped to the channel's full scale
pub(crate) fn write_intensity<P: PwmInterface>(pwm: &mut P, magnitude: u32) -> Result<(), MotorError> {
    let max = pwm.max_duty_cycle();
    let duty = magnitude.min(u32::from(max)) as u16;
    pwm.set_duty_cycle(duty)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::{MockState, SharedState};
    use crate::libraries::i2c_commander::{CommanderConfig, I2cCommander};
    use crate::platform::mock::{MockGpio, MockI2c, MockPwm, MockServo, MockTimer};
    use crate::platform::traits::{I2cConfig, ServoInterface};

    fn pwm_config(bits: u8) -> PwmConfig {
        PwmConfig::new(DEFAULT_PWM_FREQUENCY_HZ, bits)
    }

    fn dual_pin(bits: u8, inverted: bool) -> Motor<DualPinDriver<MockPwm, MockGpio, MockGpio>> {
        let driver = DualPinDriver::new(
            pwm_config(bits),
            MockPwm::default(),
            MockGpio::new(),
            MockGpio::new(),
        );
        Motor::new(driver, inverted)
    }

    fn single_pin(bits: u8, inverted: bool) -> Motor<SinglePinDriver<MockPwm, MockGpio>> {
        let driver = SinglePinDriver::new(pwm_config(bits), MockPwm::default(), MockGpio::new());
        Motor::new(driver, inverted)
    }

    fn half_bridge(bits: u8, inverted: bool) -> Motor<HalfBridgeDriver<MockPwm, MockPwm>> {
        let driver = HalfBridgeDriver::new(pwm_config(bits), MockPwm::default(), MockPwm::default());
        Motor::new(driver, inverted)
    }

    fn esc(inverted: bool) -> Motor<EscDriver<MockServo>> {
        Motor::new(EscDriver::new(MockServo::new(), EscConfig::DEFAULT), inverted)
    }

    fn commander() -> MockState<I2cCommander<MockI2c>> {
        let mut commander = I2cCommander::new(MockI2c::new(I2cConfig::default()), CommanderConfig::default());
        commander.add_motors(0x60, 1).unwrap();
        commander.init(&mut MockTimer::new()).unwrap();
        MockState::new(commander)
    }

    /// Exercise the common contract laws on one motor
    fn check_contract<M: MotorDriver>(motor: &mut M, max: i32) {
        // Boot safety
        assert!(motor.state().is_neutral());

        // Stop before any drive
        motor.stop().unwrap();
        assert!(motor.state().is_neutral());

        // Drive then stop is neutral
        for command in [max, -max, 1, -1, max / 2] {
            motor.drive(command).unwrap();
            assert!(!motor.state().is_neutral());
            motor.stop().unwrap();
            assert!(motor.state().is_neutral());
        }

        // Zero command is idempotent and neutral
        motor.drive(0).unwrap();
        let first = motor.state();
        motor.drive(0).unwrap();
        assert_eq!(motor.state(), first);
        assert!(first.is_neutral());
    }

    #[test]
    fn test_contract_dual_pin() {
        check_contract(&mut dual_pin(8, false), 255);
        check_contract(&mut dual_pin(10, true), 1023);
    }

    #[test]
    fn test_contract_single_pin() {
        check_contract(&mut single_pin(8, false), 255);
        check_contract(&mut single_pin(8, true), 255);
    }

    #[test]
    fn test_contract_half_bridge() {
        check_contract(&mut half_bridge(8, false), 255);
        check_contract(&mut half_bridge(12, true), 4095);
    }

    #[test]
    fn test_contract_esc() {
        check_contract(&mut esc(false), 500);
        check_contract(&mut esc(true), 500);
    }

    #[test]
    fn test_contract_relay() {
        let bus = commander();
        let driver = RelayDriver::new(&bus, 0, RelayConfig::DEFAULT);
        check_contract(&mut Motor::new(driver, false), 255);
    }

    #[test]
    fn test_inversion_law() {
        for command in [0, 1, 80, 255, -1, -80, -255] {
            let mut inverted = single_pin(8, true);
            let mut plain = single_pin(8, false);
            inverted.drive(command).unwrap();
            plain.drive(-command).unwrap();
            assert_eq!(inverted.state(), plain.state());

            let mut inverted = half_bridge(8, true);
            let mut plain = half_bridge(8, false);
            inverted.drive(command).unwrap();
            plain.drive(-command).unwrap();
            assert_eq!(inverted.state(), plain.state());

            let mut inverted = dual_pin(8, true);
            let mut plain = dual_pin(8, false);
            inverted.drive(command).unwrap();
            plain.drive(-command).unwrap();
            let (a, b) = (inverted.generator(), plain.generator());
            assert_eq!(a.in_a().read(), b.in_a().read());
            assert_eq!(a.in_b().read(), b.in_b().read());
            assert_eq!(a.pwm().duty_cycle(), b.pwm().duty_cycle());

            let mut inverted = esc(true);
            let mut plain = esc(false);
            inverted.drive(command).unwrap();
            plain.drive(-command).unwrap();
            assert_eq!(
                inverted.generator().servo().microseconds(),
                plain.generator().servo().microseconds()
            );

            let (bus_a, bus_b) = (commander(), commander());
            let mut inverted = Motor::new(RelayDriver::new(&bus_a, 0, RelayConfig::DEFAULT), true);
            let mut plain = Motor::new(RelayDriver::new(&bus_b, 0, RelayConfig::DEFAULT), false);
            inverted.drive(command).unwrap();
            plain.drive(-command).unwrap();
            assert_eq!(
                bus_a.with(|c| c.bus().writes_to(0x60)),
                bus_b.with(|c| c.bus().writes_to(0x60))
            );
            assert_eq!(inverted.state(), plain.state());
        }
    }

    #[test]
    fn test_inverted_extreme_command_saturates() {
        let mut motor = dual_pin(8, true);
        motor.drive(i32::MIN).unwrap();
        assert_eq!(motor.state(), MotorState::new(Direction::Forward, 255));
    }

    #[test]
    fn test_scenario_dual_pin() {
        let mut motor = dual_pin(8, false);

        motor.drive(120).unwrap();
        let driver = motor.generator();
        assert!(driver.in_a().read());
        assert!(!driver.in_b().read());
        assert_eq!(driver.pwm().duty_cycle(), 120);

        motor.drive(-120).unwrap();
        let driver = motor.generator();
        assert!(!driver.in_a().read());
        assert!(driver.in_b().read());
        assert_eq!(driver.pwm().duty_cycle(), 120);
    }

    #[test]
    fn test_scenario_half_bridge() {
        let mut motor = half_bridge(8, false);

        motor.drive(50).unwrap();
        assert_eq!(motor.generator().reverse_pin().duty_cycle(), 0);
        assert_eq!(motor.generator().forward_pin().duty_cycle(), 50);

        motor.drive(-50).unwrap();
        assert_eq!(motor.generator().forward_pin().duty_cycle(), 0);
        assert_eq!(motor.generator().reverse_pin().duty_cycle(), 50);
    }

    #[test]
    fn test_scenario_esc() {
        let mut motor = esc(false);
        assert_eq!(motor.generator().servo().microseconds(), 1500);

        motor.drive(200).unwrap();
        assert_eq!(motor.generator().servo().microseconds(), 1700);

        motor.drive(-200).unwrap();
        assert_eq!(motor.generator().servo().microseconds(), 1300);

        motor.stop().unwrap();
        assert_eq!(motor.generator().servo().microseconds(), 1500);
    }

    #[test]
    fn test_scenario_inverted_single_pin() {
        let mut inverted = single_pin(8, true);
        let mut plain = single_pin(8, false);

        inverted.drive(80).unwrap();
        plain.drive(-80).unwrap();

        assert!(!inverted.generator().direction_pin().read());
        assert_eq!(inverted.generator().pwm().duty_cycle(), 80);
        assert_eq!(
            inverted.generator().direction_pin().read(),
            plain.generator().direction_pin().read()
        );
        assert_eq!(
            inverted.generator().pwm().duty_cycle(),
            plain.generator().pwm().duty_cycle()
        );
    }

    #[test]
    fn test_magnitude_clamped_to_resolution() {
        let mut motor = dual_pin(8, false);
        motor.drive(5000).unwrap();
        assert_eq!(motor.generator().pwm().duty_cycle(), 255);

        motor.drive(-5000).unwrap();
        assert_eq!(motor.state(), MotorState::new(Direction::Reverse, 255));
    }

    #[test]
    fn test_motor_new_has_no_side_effects() {
        let driver = DualPinDriver::new(pwm_config(8), MockPwm::default(), MockGpio::new(), MockGpio::new());
        let writes = driver.pwm().writes();
        let motor = Motor::new(driver, true);
        assert!(motor.is_inverted());
        assert_eq!(motor.generator().pwm().writes(), writes);
    }

    #[test]
    fn test_configure_pwm_keeps_hardware_default_frequency() {
        let mut pwm = MockPwm::new(PwmConfig::new(1000, 8));
        configure_pwm(&mut pwm, PwmConfig::new(0, 10));
        assert_eq!(pwm.frequency(), 1000);
        assert_eq!(pwm.max_duty_cycle(), 1023);
        assert!(pwm.is_enabled());
        assert_eq!(pwm.duty_cycle(), 0);
    }

    #[test]
    fn test_configure_pwm_is_best_effort() {
        let mut pwm = MockPwm::new(PwmConfig::new(0, 8));
        configure_pwm(&mut pwm, PwmConfig::new(20_000, 0));
        assert_eq!(pwm.resolution(), 8);
        assert_eq!(pwm.frequency(), 20_000);
        assert!(pwm.is_enabled());
    }

    #[test]
    fn test_esc_servo_attached_at_construction() {
        let motor = esc(false);
        assert!(motor.generator().servo().is_attached());
    }
}
