//! I2C register commander for remote motor controllers
//!
//! Remote controllers expose a small register file over I2C. One device may
//! host several motors; the active one is chosen by writing its channel to
//! [`Register::MotorAddress`] before the register write.
//!
//! ## Frame Layout
//!
//! | Byte | Content                                  |
//! |------|------------------------------------------|
//! | 0    | Register                                 |
//! | 1..  | Payload (`f32` values are little-endian) |
//!
//! The commander is process-wide: build it once, register the remote motors,
//! call [`I2cCommander::init`] during bring-up, then hand it to relay drivers
//! through a [`SharedState`](crate::core::traits::SharedState).
//!
//! # Example
//!
//! ```ignore
//! use motor_hal::core::traits::MockState;
//! use motor_hal::libraries::i2c_commander::{CommanderConfig, I2cCommander};
//! use motor_hal::libraries::motor_driver::{RelayConfig, RelayDriver};
//! use motor_hal::platform::mock::{MockI2c, MockTimer};
//! use motor_hal::platform::traits::I2cConfig;
//!
//! let mut commander = I2cCommander::new(MockI2c::new(I2cConfig::default()), CommanderConfig::default());
//! let first = commander.add_motors(0x60, 2).unwrap();
//! commander.init(&mut MockTimer::new()).unwrap();
//! assert_eq!(first, 0);
//!
//! let shared = MockState::new(commander);
//! let left = RelayDriver::new(&shared, first, RelayConfig::default());
//! ```

use heapless::{LinearMap, Vec};

use crate::libraries::motor_driver::{ConfigError, TransportError};
use crate::platform::traits::{I2cConfig, I2cInterface, TimerInterface};

/// Maximum remote motors one commander addresses
pub const MAX_REMOTE_MOTORS: usize = 8;

/// Largest payload carried by one register write
pub const MAX_PAYLOAD: usize = 8;

/// Remote controller registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Controller status, read during bring-up probing
    Status = 0x00,
    /// Motor target (`f32`)
    Target = 0x01,
    /// Select the motor channel for following writes (`u8`)
    MotorAddress = 0x7F,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// One remote motor: device address plus channel on that device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RemoteMotor {
    pub address: u8,
    pub channel: u8,
}

/// Bus bring-up parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommanderConfig {
    /// Bus frequency and per-transaction timeout
    pub bus: I2cConfig,
    /// Probe attempts per device during `init`
    pub probe_attempts: u8,
    /// Delay between probe attempts (controllers may still be booting)
    pub probe_interval_ms: u32,
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            bus: I2cConfig::default(),
            probe_attempts: 5,
            probe_interval_ms: 1000,
        }
    }
}

/// Register commander over one I2C bus
pub struct I2cCommander<I: I2cInterface> {
    bus: I,
    config: CommanderConfig,
    motors: Vec<RemoteMotor, MAX_REMOTE_MOTORS>,
    /// Last channel selected per device address
    selected: LinearMap<u8, u8, MAX_REMOTE_MOTORS>,
    initialized: bool,
}

impl<I: I2cInterface> I2cCommander<I> {
    pub fn new(bus: I, config: CommanderConfig) -> Self {
        Self {
            bus,
            config,
            motors: Vec::new(),
            selected: LinearMap::new(),
            initialized: false,
        }
    }

    /// Register `count` motors hosted by the device at `address`
    ///
    /// Returns the motor index of the first one; the rest follow in order.
    pub fn add_motors(&mut self, address: u8, count: u8) -> Result<u8, ConfigError> {
        if address > 0x7F {
            return Err(ConfigError::InvalidAddress(address));
        }
        if self.motors.len() + usize::from(count) > MAX_REMOTE_MOTORS {
            return Err(ConfigError::TooManyMotors);
        }

        let first = self.motors.len() as u8;
        let hosted = self.motors.iter().filter(|m| m.address == address).count() as u8;
        for channel in hosted..hosted + count {
            self.motors
                .push(RemoteMotor { address, channel })
                .map_err(|_| ConfigError::TooManyMotors)?;
        }
        Ok(first)
    }

    /// One-time bus bring-up
    ///
    /// Programs frequency and timeout where the bus allows it, then probes
    /// every registered device. The commander is usable afterwards even if a
    /// device did not answer; the first silent device is reported.
    pub fn init<T: TimerInterface>(&mut self, timer: &mut T) -> Result<(), TransportError> {
        if let Err(e) = self.bus.set_frequency(self.config.bus.frequency) {
            crate::log_warn!("I2C frequency not applied: {}", e);
        }
        if let Err(e) = self.bus.set_timeout(self.config.bus.timeout_us) {
            crate::log_warn!("I2C timeout not applied: {}", e);
        }
        self.selected.clear();
        self.initialized = true;

        let mut missing = None;
        for (index, motor) in self.motors.iter().enumerate() {
            // Probe each device once
            if self.motors[..index].iter().any(|m| m.address == motor.address) {
                continue;
            }
            if !Self::probe(&mut self.bus, &self.config, timer, motor.address) {
                crate::log_warn!("I2C device {} not responding", motor.address);
                if missing.is_none() {
                    missing = Some(motor.address);
                }
            }
        }

        crate::log_info!("I2C commander initialized ({} motors)", self.motors.len());
        match missing {
            Some(address) => Err(TransportError::NoResponse(address)),
            None => Ok(()),
        }
    }

    fn probe<T: TimerInterface>(bus: &mut I, config: &CommanderConfig, timer: &mut T, address: u8) -> bool {
        let mut status = [0u8; 1];
        for attempt in 0..config.probe_attempts.max(1) {
            if attempt > 0 {
                if let Err(e) = timer.delay_ms(config.probe_interval_ms) {
                    crate::log_warn!("Probe delay failed: {}", e);
                }
            }
            if bus.write_read(address, &[Register::Status.addr()], &mut status).is_ok() {
                return true;
            }
        }
        false
    }

    /// Write `data` to `register` of remote motor `motor`
    pub fn write_register(&mut self, motor: u8, register: Register, data: &[u8]) -> Result<(), TransportError> {
        if !self.initialized {
            return Err(TransportError::NotInitialized);
        }
        let remote = *self
            .motors
            .get(usize::from(motor))
            .ok_or(TransportError::UnknownMotor(motor))?;

        if self.is_shared(remote.address) && self.selected.get(&remote.address) != Some(&remote.channel) {
            let select = [Register::MotorAddress.addr(), remote.channel];
            if let Err(e) = self.send(remote.address, &select) {
                self.selected.remove(&remote.address);
                return Err(e);
            }
            self.selected
                .insert(remote.address, remote.channel)
                .map_err(|_| TransportError::UnknownMotor(motor))?;
        }

        let mut frame: Vec<u8, { MAX_PAYLOAD + 1 }> = Vec::new();
        frame
            .push(register.addr())
            .map_err(|_| TransportError::FrameTooLong)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| TransportError::FrameTooLong)?;
        self.send(remote.address, &frame)
    }

    fn send(&mut self, address: u8, frame: &[u8]) -> Result<(), TransportError> {
        let written = self.bus.write(address, frame)?;
        if written != frame.len() {
            return Err(TransportError::ShortWrite {
                expected: frame.len() as u8,
                written: written as u8,
            });
        }
        Ok(())
    }

    fn is_shared(&self, address: u8) -> bool {
        self.motors.iter().filter(|m| m.address == address).count() > 1
    }

    pub fn motor_count(&self) -> usize {
        self.motors.len()
    }

    pub fn motor(&self, index: u8) -> Option<&RemoteMotor> {
        self.motors.get(usize::from(index))
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn bus(&self) -> &I {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut I {
        &mut self.bus
    }
}
