#![cfg_attr(not(any(test, feature = "mock")), no_std)]

//! motor_hal - Motor driver hardware abstraction for microcontroller robots
//!
//! Translates a signed drive command into the signalling of a concrete motor
//! driver: dual-pin and single-pin H-bridges, half-bridge pairs, servo-pulse
//! ESCs and remote controllers reached over I2C.

// Platform abstraction layer (pins, PWM, servo pulses, I2C, timers)
pub mod platform;

// Core infrastructure (logging, shared state)
pub mod core;

// Motor driver libraries
pub mod libraries;
