//! Motor driver error types

use core::fmt;

use crate::platform::PlatformError;
use crate::platform::error::I2cError;

/// Errors returned by `drive` / `stop` and by driver construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Invalid driver configuration
    Config(ConfigError),
    /// Relay transaction failed (recoverable; the next command retries)
    Transport(TransportError),
    /// A pin-level primitive refused a write
    Platform(PlatformError),
}

/// Configuration errors, detected before any hardware is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// PWM resolution outside `MIN_PWM_BITS..=MAX_PWM_BITS`
    InvalidResolution(u8),
    /// ESC pulse window not ordered `min <= neutral <= max` inside one frame
    InvalidPulseRange,
    /// Relay target scale or limit is not a finite positive number
    InvalidTargetScale,
    /// Relay wiring requested but no commander was supplied
    MissingTransport,
    /// Commander motor table is full
    TooManyMotors,
    /// Bus address outside the 7-bit range
    InvalidAddress(u8),
    /// Relay motor index not registered on the commander
    UnknownMotor(u8),
}

/// Relay transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The bus reported an error (NACK, timeout, arbitration, ...)
    Bus(I2cError),
    /// Fewer bytes were acknowledged than sent
    ShortWrite { expected: u8, written: u8 },
    /// The commander has not been brought up
    NotInitialized,
    /// No remote motor registered under this index
    UnknownMotor(u8),
    /// A device did not answer the bring-up probe
    NoResponse(u8),
    /// Payload does not fit into one register frame
    FrameTooLong,
    /// No transport attached to this driver
    Unavailable,
}

impl TransportError {
    /// A repeated attempt may succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Bus(_) | TransportError::ShortWrite { .. })
    }
}

impl From<PlatformError> for TransportError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::I2c(e) => TransportError::Bus(e),
            _ => TransportError::Unavailable,
        }
    }
}

impl From<PlatformError> for MotorError {
    fn from(error: PlatformError) -> Self {
        match error {
            PlatformError::I2c(_) => MotorError::Transport(error.into()),
            other => MotorError::Platform(other),
        }
    }
}

impl From<ConfigError> for MotorError {
    fn from(error: ConfigError) -> Self {
        MotorError::Config(error)
    }
}

impl From<TransportError> for MotorError {
    fn from(error: TransportError) -> Self {
        MotorError::Transport(error)
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::Config(e) => write!(f, "configuration error: {}", e),
            MotorError::Transport(e) => write!(f, "transport error: {}", e),
            MotorError::Platform(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidResolution(bits) => write!(f, "unsupported PWM resolution {} bits", bits),
            ConfigError::InvalidPulseRange => write!(f, "ESC pulse window out of order"),
            ConfigError::InvalidTargetScale => write!(f, "relay target scale must be finite and positive"),
            ConfigError::MissingTransport => write!(f, "relay motor without a commander"),
            ConfigError::TooManyMotors => write!(f, "commander motor table full"),
            ConfigError::InvalidAddress(addr) => write!(f, "invalid I2C address {:#04x}", addr),
            ConfigError::UnknownMotor(index) => write!(f, "relay motor {} not registered", index),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Bus(e) => write!(f, "bus error {:?}", e),
            TransportError::ShortWrite { expected, written } => {
                write!(f, "short write ({} of {} bytes)", written, expected)
            }
            TransportError::NotInitialized => write!(f, "commander not initialized"),
            TransportError::UnknownMotor(index) => write!(f, "no remote motor {}", index),
            TransportError::NoResponse(addr) => write!(f, "no response from {:#04x}", addr),
            TransportError::FrameTooLong => write!(f, "register frame too long"),
            TransportError::Unavailable => write!(f, "no transport"),
        }
    }
}
