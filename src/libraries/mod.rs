//! Driver libraries
//!
//! Vehicle-agnostic libraries built on the platform abstraction.
//!
//! ## Libraries
//!
//! - `i2c_commander`: Register commander for remote motor controllers on I2C
//! - `motor_driver`: Motor driver abstraction (H-bridge, half-bridge, ESC, relay)

pub mod i2c_commander;
pub mod motor_driver;

// Re-export commonly used types
pub use i2c_commander::{CommanderConfig, I2cCommander, Register};
pub use motor_driver::{
    AnyDriver, DriverConfig, Motor, MotorBuilder, MotorDriver, MotorError, MotorGroup, MotorState,
    SignalGenerator,
};
