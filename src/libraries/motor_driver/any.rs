//! Variant selection at configuration time
//!
//! [`MotorBuilder`] turns a [`DriverConfig`] into a `Motor<AnyDriver<_>>`,
//! allocating pins from the [`Platform`]. The variant set is closed, so the
//! result is a plain enum: no heap, no trait objects.

use super::{
    DualPinDriver, EscDriver, HalfBridgeDriver, Motor, MotorError, MotorState, SignalGenerator,
    SinglePinDriver,
    config::{DriverConfig, MotorKind, MotorWiring},
    error::ConfigError,
    relay::{NoTransport, RegisterBus, RelayDriver},
};
use crate::platform::traits::Platform;

/// Any supported driver topology over platform `P`
///
/// `B` is the relay transport; boards without relay motors keep the default.
pub enum AnyDriver<P: Platform, B: RegisterBus = NoTransport> {
    DualPin(DualPinDriver<P::Pwm, P::Gpio, P::Gpio>),
    SinglePin(SinglePinDriver<P::Pwm, P::Gpio>),
    HalfBridge(HalfBridgeDriver<P::Pwm, P::Pwm>),
    Esc(EscDriver<P::Servo>),
    Relay(RelayDriver<B>),
}

impl<P: Platform, B: RegisterBus> AnyDriver<P, B> {
    pub fn kind(&self) -> MotorKind {
        match self {
            AnyDriver::DualPin(_) => MotorKind::DualPin,
            AnyDriver::SinglePin(_) => MotorKind::SinglePin,
            AnyDriver::HalfBridge(_) => MotorKind::HalfBridge,
            AnyDriver::Esc(_) => MotorKind::Esc,
            AnyDriver::Relay(_) => MotorKind::Relay,
        }
    }
}

impl<P: Platform, B: RegisterBus> SignalGenerator for AnyDriver<P, B> {
    #[inline]
    fn forward(&mut self, magnitude: u32) -> Result<(), MotorError> {
        match self {
            AnyDriver::DualPin(d) => d.forward(magnitude),
            AnyDriver::SinglePin(d) => d.forward(magnitude),
            AnyDriver::HalfBridge(d) => d.forward(magnitude),
            AnyDriver::Esc(d) => d.forward(magnitude),
            AnyDriver::Relay(d) => d.forward(magnitude),
        }
    }

    #[inline]
    fn reverse(&mut self, magnitude: u32) -> Result<(), MotorError> {
        match self {
            AnyDriver::DualPin(d) => d.reverse(magnitude),
            AnyDriver::SinglePin(d) => d.reverse(magnitude),
            AnyDriver::HalfBridge(d) => d.reverse(magnitude),
            AnyDriver::Esc(d) => d.reverse(magnitude),
            AnyDriver::Relay(d) => d.reverse(magnitude),
        }
    }

    #[inline]
    fn brake(&mut self) -> Result<(), MotorError> {
        match self {
            AnyDriver::DualPin(d) => d.brake(),
            AnyDriver::SinglePin(d) => d.brake(),
            AnyDriver::HalfBridge(d) => d.brake(),
            AnyDriver::Esc(d) => d.brake(),
            AnyDriver::Relay(d) => d.brake(),
        }
    }

    fn state(&self) -> MotorState {
        match self {
            AnyDriver::DualPin(d) => d.state(),
            AnyDriver::SinglePin(d) => d.state(),
            AnyDriver::HalfBridge(d) => d.state(),
            AnyDriver::Esc(d) => d.state(),
            AnyDriver::Relay(d) => d.state(),
        }
    }
}

/// Builds motors from configs, allocating pins from a platform
///
/// # Example
///
/// ```ignore
/// let mut builder = MotorBuilder::new(&mut platform).with_commander(&commander);
/// let left = builder.build(&DriverConfig::half_bridge(2, 3))?;
/// let right = builder.build(&DriverConfig::relay(0).with_inverted(true))?;
/// ```
pub struct MotorBuilder<'p, P: Platform, B: RegisterBus = NoTransport> {
    platform: &'p mut P,
    transport: B,
}

impl<'p, P: Platform> MotorBuilder<'p, P, NoTransport> {
    pub fn new(platform: &'p mut P) -> Self {
        Self {
            platform,
            transport: NoTransport,
        }
    }
}

impl<'p, P: Platform, B: RegisterBus + Clone> MotorBuilder<'p, P, B> {
    /// Use `transport` for relay motors
    pub fn with_commander<C: RegisterBus + Clone>(self, transport: C) -> MotorBuilder<'p, P, C> {
        MotorBuilder {
            platform: self.platform,
            transport,
        }
    }

    /// Validate `config`, allocate its pins and construct the driver
    ///
    /// The driver is neutral when this returns.
    pub fn build(&mut self, config: &DriverConfig) -> Result<Motor<AnyDriver<P, B>>, MotorError> {
        config.validate()?;
        let pwm_config = config.pwm_config();

        let driver = match config.wiring {
            MotorWiring::DualPin { pwm, in_a, in_b } => {
                let pwm = self.platform.create_pwm(pwm, pwm_config)?;
                let in_a = self.platform.create_gpio(in_a)?;
                let in_b = self.platform.create_gpio(in_b)?;
                AnyDriver::DualPin(DualPinDriver::new(pwm_config, pwm, in_a, in_b))
            }
            MotorWiring::SinglePin { pwm, direction } => {
                let pwm = self.platform.create_pwm(pwm, pwm_config)?;
                let direction = self.platform.create_gpio(direction)?;
                AnyDriver::SinglePin(SinglePinDriver::new(pwm_config, pwm, direction))
            }
            MotorWiring::HalfBridge { in_a, in_b } => {
                let in_a = self.platform.create_pwm(in_a, pwm_config)?;
                let in_b = self.platform.create_pwm(in_b, pwm_config)?;
                AnyDriver::HalfBridge(HalfBridgeDriver::new(pwm_config, in_a, in_b))
            }
            MotorWiring::Esc { pin, pulse } => {
                let servo = self.platform.create_servo(pin)?;
                AnyDriver::Esc(EscDriver::new(servo, pulse))
            }
            MotorWiring::Relay { motor, relay } => {
                if !self.transport.is_connected() {
                    return Err(ConfigError::MissingTransport.into());
                }
                if !self.transport.has_motor(motor) {
                    return Err(ConfigError::UnknownMotor(motor).into());
                }
                AnyDriver::Relay(RelayDriver::new(self.transport.clone(), motor, relay))
            }
        };

        crate::log_info!("Motor built: {}", driver.kind());
        Ok(Motor::new(driver, config.inverted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockState;
    use crate::libraries::i2c_commander::{CommanderConfig, I2cCommander};
    use crate::libraries::motor_driver::{Direction, MotorDriver};
    use crate::platform::PlatformError;
    use crate::platform::error::GpioError;
    use crate::platform::mock::{MockI2c, MockPlatform, MockTimer};
    use crate::platform::traits::{I2cConfig, PwmInterface, ServoInterface};

    #[test]
    fn test_build_each_pin_variant() {
        let mut platform = MockPlatform::new();
        let mut builder = MotorBuilder::new(&mut platform);

        let configs = [
            DriverConfig::dual_pin(0, 1, 2),
            DriverConfig::single_pin(3, 4),
            DriverConfig::half_bridge(5, 6),
            DriverConfig::esc(7),
        ];
        for config in &configs {
            let mut motor = builder.build(config).unwrap();
            assert_eq!(motor.generator().kind(), config.wiring.kind());
            assert!(motor.state().is_neutral());

            motor.drive(-10).unwrap();
            assert_eq!(motor.state(), MotorState::new(Direction::Reverse, 10));
            motor.stop().unwrap();
            assert!(motor.state().is_neutral());
        }
        assert_eq!(platform.pins_allocated(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_build_applies_pwm_settings() {
        let mut platform = MockPlatform::new();
        let mut builder = MotorBuilder::new(&mut platform);
        let config = DriverConfig::single_pin(3, 4).with_pwm_bits(8).with_pwm_frequency(1_000);

        let motor = builder.build(&config).unwrap();
        match motor.generator() {
            AnyDriver::SinglePin(d) => {
                assert_eq!(d.pwm().max_duty_cycle(), 255);
                assert_eq!(d.pwm().frequency(), 1_000);
            }
            _ => panic!("expected single-pin driver"),
        }
    }

    #[test]
    fn test_build_esc_is_attached_and_neutral() {
        let mut platform = MockPlatform::new();
        let motor = MotorBuilder::new(&mut platform).build(&DriverConfig::esc(9)).unwrap();
        match motor.generator() {
            AnyDriver::Esc(d) => {
                assert!(d.servo().is_attached());
                assert_eq!(d.servo().microseconds(), 1500);
            }
            _ => panic!("expected ESC driver"),
        }
    }

    #[test]
    fn test_build_inverted() {
        let mut platform = MockPlatform::new();
        let mut builder = MotorBuilder::new(&mut platform);
        let mut motor = builder.build(&DriverConfig::dual_pin(0, 1, 2).with_inverted(true)).unwrap();

        motor.drive(30).unwrap();
        assert_eq!(motor.state(), MotorState::new(Direction::Reverse, 30));
    }

    #[test]
    fn test_build_detects_pin_conflict() {
        let mut platform = MockPlatform::new();
        let mut builder = MotorBuilder::new(&mut platform);
        builder.build(&DriverConfig::dual_pin(0, 1, 2)).unwrap();

        assert_eq!(
            builder.build(&DriverConfig::single_pin(2, 3)).err(),
            Some(MotorError::Platform(PlatformError::Gpio(GpioError::PinInUse)))
        );
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut platform = MockPlatform::new();
        let mut builder = MotorBuilder::new(&mut platform);

        assert_eq!(
            builder.build(&DriverConfig::dual_pin(0, 1, 2).with_pwm_bits(20)).err(),
            Some(MotorError::Config(ConfigError::InvalidResolution(20)))
        );
        assert_eq!(
            builder.build(&DriverConfig::relay(0)).err(),
            Some(MotorError::Config(ConfigError::MissingTransport))
        );
        // Nothing allocated by rejected configs
        assert!(platform.pins_allocated().is_empty());
    }

    #[test]
    fn test_build_relay_with_commander() {
        let mut commander = I2cCommander::new(MockI2c::new(I2cConfig::default()), CommanderConfig::default());
        commander.add_motors(0x60, 2).unwrap();
        commander.init(&mut MockTimer::new()).unwrap();
        let commander = MockState::new(commander);

        let mut platform = MockPlatform::new();
        let mut builder = MotorBuilder::new(&mut platform).with_commander(&commander);
        let mut left = builder.build(&DriverConfig::relay(0)).unwrap();
        let mut right = builder.build(&DriverConfig::relay(1).with_inverted(true)).unwrap();
        let mut front = builder.build(&DriverConfig::half_bridge(2, 3)).unwrap();

        assert_eq!(left.generator().kind(), MotorKind::Relay);
        assert_eq!(
            builder.build(&DriverConfig::relay(7)).err(),
            Some(MotorError::Config(ConfigError::UnknownMotor(7)))
        );
        left.drive(5).unwrap();
        right.drive(5).unwrap();
        front.drive(5).unwrap();

        assert_eq!(left.state(), MotorState::new(Direction::Forward, 5));
        assert_eq!(right.state(), MotorState::new(Direction::Reverse, 5));
        assert_eq!(front.state(), MotorState::new(Direction::Forward, 5));
        assert!(!left.is_faulted());
    }
}
