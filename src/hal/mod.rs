//! Hardware Abstraction Layer for RustTiltMorse.
//!
//! Thin wrappers around the sensor bus and ESP-IDF peripherals.
//! Business logic stays in core modules, HAL is just I/O.

pub mod icm42670;

#[cfg(target_os = "espidf")]
pub mod esp;

pub use icm42670::{Icm42670, SensorError, ICM42670_ADDR};
