//! Core infrastructure
//!
//! Logging macros and synchronization traits shared by every driver.

pub mod logging;
pub mod traits;
