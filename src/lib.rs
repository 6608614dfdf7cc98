//! Analog sampler library.
//!
//! A configurable analog input for the sensor framework: raw ADC counts and
//! millivolts, optional rolling-average smoothing, JSON configuration
//! persisted under `/settings/sen/`.  All ESP-IDF-specific code is guarded
//! by `#[cfg(target_os = "espidf")]` within each module, so the library
//! builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod error;
pub mod pins;
pub mod ports;
pub mod sensors;

pub use error::{Error, Result};
pub use sensors::Sensor;
pub use sensors::analog::{Acquisition, AdcScale, AnalogSampler};
