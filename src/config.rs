//! Analog input configuration.
//!
//! [`AnalogConfig`] is both the in-memory configuration and its JSON wire
//! form. Field names on the wire are fixed by the settings files already
//! deployed to devices, so every field carries an explicit rename.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory every sensor config file lives in.
pub const CONFIG_DIR: &str = "/settings/sen/";
/// Config file name used when the caller does not supply one.
pub const DEFAULT_CONFIG_FILE: &str = "GenericAnalogInput.json";

/// Largest rolling-average window a sampler can hold.
pub const MAX_AVERAGE_SIZE: usize = 128;

pub const DEFAULT_AVERAGE_SIZE: usize = 5;
pub const DEFAULT_ADC_VOLTAGE_MV: u32 = 3300;
pub const DEFAULT_ADC_RESOLUTION: u32 = 4096;

/// Build the absolute storage path for a config file name.
pub fn config_path(file_name: &str) -> String {
    format!("{}{}", CONFIG_DIR, file_name)
}

/// Persisted configuration of one analog input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogConfig {
    /// Device name, mirrored into the sensor descriptor.
    #[serde(rename = "Name")]
    pub name: String,
    /// GPIO the analog signal is wired to.
    #[serde(rename = "Pin")]
    pub pin: i32,
    /// Smooth both channels with a rolling average.
    #[serde(rename = "RollingAverage")]
    pub rolling_average: bool,
    /// Samples kept per channel window.
    #[serde(rename = "AverageSize")]
    pub average_size: usize,
    /// ADC full-scale voltage, used when millivolts are derived from raw counts.
    #[serde(
        rename = "ADC_Voltage_mv",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub adc_voltage_mv: Option<u32>,
    /// ADC full-scale count, used when millivolts are derived from raw counts.
    #[serde(
        rename = "ADC_Resolution",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub adc_resolution: Option<u32>,
}

impl AnalogConfig {
    /// Configuration before anything has been loaded: smoothing off,
    /// default window size, no ADC scale.
    pub fn new(name: &str, pin: i32) -> Self {
        Self {
            name: name.into(),
            pin,
            rolling_average: false,
            average_size: DEFAULT_AVERAGE_SIZE,
            adc_voltage_mv: None,
            adc_resolution: None,
        }
    }

    /// Parse a JSON document. Parser detail is logged before returning.
    pub fn from_json(json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).map_err(|e| {
            log::warn!("Deserialization failed: {}", e);
            Error::from(e)
        })
    }

    pub fn to_json(&self) -> String {
        // Plain struct of strings, integers and bools: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Reject values the sampler cannot operate with.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation("Name must not be empty"));
        }
        if !(1..=MAX_AVERAGE_SIZE).contains(&self.average_size) {
            return Err(Error::Validation("AverageSize must be 1–128"));
        }
        if self.adc_voltage_mv == Some(0) {
            return Err(Error::Validation("ADC_Voltage_mv must be > 0"));
        }
        if self.adc_resolution == Some(0) {
            return Err(Error::Validation("ADC_Resolution must be > 0"));
        }
        Ok(())
    }
}
