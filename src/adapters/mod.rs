//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter | Implements    | Connects to                         |
//! |---------|---------------|-------------------------------------|
//! | `adc`   | AnalogPort    | ESP32-S3 ADC1 oneshot + calibration |
//! | `flash` | StoragePort   | FAT partition / host directory      |

pub mod adc;
pub mod flash;
