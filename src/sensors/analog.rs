//! Generic analog input sensor.
//!
//! Reads an ADC pin, optionally smooths it with a rolling average, and
//! reports two parameters: millivolts (slot 0) and raw counts (slot 1).
//! Configuration is a JSON file under [`CONFIG_DIR`](crate::config::CONFIG_DIR).
//!
//! ## Acquisition strategies
//!
//! - [`Acquisition::DualChannel`] asks the hardware for raw counts and for a
//!   calibrated millivolt reading separately.  Each channel has its own
//!   window, so the two smoothed outputs are sampled at different instants
//!   and need not agree numerically.
//! - [`Acquisition::DerivedFromRaw`] reads raw counts only and scales them
//!   linearly with the configured `ADC_Voltage_mv` / `ADC_Resolution`.

use log::{debug, info, warn};

use crate::config::{
    self, AnalogConfig, DEFAULT_ADC_RESOLUTION, DEFAULT_ADC_VOLTAGE_MV, DEFAULT_AVERAGE_SIZE,
};
use crate::error::{Error, Result};
use crate::ports::{AnalogPort, StoragePort};

use super::window::SampleWindow;
use super::{Readings, Sensor, SensorDescriptor};

pub const SENSOR_KIND: &str = "analog input";
pub const PARAMETERS: [&str; 2] = ["Analog Signal", "ADC Reading"];
pub const UNITS: [&str; 2] = ["mv", "raw"];

const SLOT_MILLIVOLTS: usize = 0;
const SLOT_RAW: usize = 1;

/// How the millivolt channel is obtained.  Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// Scale the (possibly averaged) raw reading by the configured ADC range.
    DerivedFromRaw,
    /// Read raw and millivolt channels independently, each with its own window.
    DualChannel,
}

/// Linear raw-count to millivolt conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdcScale {
    pub voltage_mv: u32,
    pub resolution: u32,
}

impl Default for AdcScale {
    fn default() -> Self {
        Self {
            voltage_mv: DEFAULT_ADC_VOLTAGE_MV,
            resolution: DEFAULT_ADC_RESOLUTION,
        }
    }
}

impl AdcScale {
    /// `raw × voltage_mv ÷ resolution`, truncating.
    pub fn to_millivolts(&self, raw: i32) -> i32 {
        (raw as i64 * self.voltage_mv as i64)
            .checked_div(self.resolution as i64)
            .unwrap_or(0) as i32
    }
}

/// Analog input sampler bound to one hardware port and one storage port.
pub struct AnalogSampler<H, S> {
    config: AnalogConfig,
    acquisition: Acquisition,
    config_path: String,
    descriptor: SensorDescriptor,
    values: Readings,
    raw_window: SampleWindow,
    millivolt_window: SampleWindow,
    hardware: H,
    storage: S,
}

impl<H: AnalogPort, S: StoragePort> AnalogSampler<H, S> {
    /// Construct a sampler for `pin`, configured from
    /// `/settings/sen/<config_file>` once [`start`](Self::start) runs.
    ///
    /// Touches neither hardware nor storage.
    pub fn new(
        name: &str,
        pin: i32,
        config_file: &str,
        acquisition: Acquisition,
        hardware: H,
        storage: S,
    ) -> Self {
        let mut cfg = AnalogConfig::new(name, pin);
        if acquisition == Acquisition::DerivedFromRaw {
            let scale = AdcScale::default();
            cfg.adc_voltage_mv = Some(scale.voltage_mv);
            cfg.adc_resolution = Some(scale.resolution);
        }
        Self {
            config: cfg,
            acquisition,
            config_path: config::config_path(config_file),
            descriptor: SensorDescriptor::new(name),
            values: Readings::new(),
            raw_window: SampleWindow::new(),
            millivolt_window: SampleWindow::new(),
            hardware,
            storage,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Declare the descriptor, then load the stored config or write defaults.
    pub fn start(&mut self) -> Result<()> {
        self.descriptor.declare(SENSOR_KIND, &PARAMETERS, &UNITS);
        self.values.resize(self.descriptor.parameter_quantity);

        if !self.storage.exists(&self.config_path) {
            info!(
                "AnalogSampler[{}]: no config at {}, writing defaults",
                self.config.name, self.config_path
            );
            self.config.rolling_average = false;
            self.config.average_size = DEFAULT_AVERAGE_SIZE;
            if self.acquisition == Acquisition::DerivedFromRaw {
                let scale = AdcScale::default();
                self.config.adc_voltage_mv = Some(scale.voltage_mv);
                self.config.adc_resolution = Some(scale.resolution);
            }
            self.save()?;
            return self.configure_input();
        }

        let contents = self.storage.read(&self.config_path).map_err(|e| {
            warn!(
                "AnalogSampler[{}]: reading {} failed: {}",
                self.config.name, self.config_path, e
            );
            Error::from(e)
        })?;
        self.apply_config(&contents, false)
    }

    /// Current configuration as JSON.
    pub fn get_config(&self) -> String {
        self.config.to_json()
    }

    /// Parse, validate and apply a JSON configuration.
    ///
    /// Nothing changes if the document fails to parse or validate.  When
    /// `persist` is set and the write fails, the new values stay applied in
    /// memory but the pin is not reconfigured.
    pub fn set_config(&mut self, config: &str, persist: bool) -> Result<()> {
        self.apply_config(config.as_bytes(), persist)
    }

    /// Put the configured pin into input mode.
    pub fn configure_input(&mut self) -> Result<()> {
        self.hardware.set_pin_input(self.config.pin).map_err(|e| {
            warn!(
                "AnalogSampler[{}]: pin {} setup failed: {}",
                self.config.name, self.config.pin, e
            );
            Error::from(e)
        })
    }

    /// Take one measurement: slot 0 = millivolts, slot 1 = raw counts.
    pub fn sample(&mut self) -> Result<()> {
        let pin = self.config.pin;
        let window = self
            .config
            .rolling_average
            .then_some(self.config.average_size);

        let (millivolts, raw) = match self.acquisition {
            Acquisition::DualChannel => {
                let mv = acquire(
                    &mut self.millivolt_window,
                    window,
                    self.hardware.read_millivolts(pin),
                );
                let raw = acquire(&mut self.raw_window, window, self.hardware.read_raw(pin));
                (mv, raw)
            }
            Acquisition::DerivedFromRaw => {
                let raw = acquire(&mut self.raw_window, window, self.hardware.read_raw(pin));
                (self.adc_scale().to_millivolts(raw), raw)
            }
        };

        self.values.set(SLOT_MILLIVOLTS, millivolts as f64);
        self.values.set(SLOT_RAW, raw as f64);
        debug!(
            "AnalogSampler[{}]: {} mV, {} raw",
            self.config.name, millivolts, raw
        );
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &AnalogConfig {
        &self.config
    }

    pub fn acquisition(&self) -> Acquisition {
        self.acquisition
    }

    pub fn config_path(&self) -> &str {
        &self.config_path
    }

    pub fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    pub fn values(&self) -> &Readings {
        &self.values
    }

    /// ADC scale in effect for the derived strategy.
    pub fn adc_scale(&self) -> AdcScale {
        let default = AdcScale::default();
        AdcScale {
            voltage_mv: self.config.adc_voltage_mv.unwrap_or(default.voltage_mv),
            resolution: self.config.adc_resolution.unwrap_or(default.resolution),
        }
    }

    pub fn raw_window(&self) -> &SampleWindow {
        &self.raw_window
    }

    pub fn millivolt_window(&self) -> &SampleWindow {
        &self.millivolt_window
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // ── Internals ─────────────────────────────────────────────

    fn apply_config(&mut self, json: &[u8], persist: bool) -> Result<()> {
        let mut incoming = AnalogConfig::from_json(json)?;
        match self.acquisition {
            // Older files may omit the scale; keep whatever is in effect.
            Acquisition::DerivedFromRaw => {
                incoming.adc_voltage_mv = incoming.adc_voltage_mv.or(self.config.adc_voltage_mv);
                incoming.adc_resolution = incoming.adc_resolution.or(self.config.adc_resolution);
            }
            Acquisition::DualChannel => {
                incoming.adc_voltage_mv = None;
                incoming.adc_resolution = None;
            }
        }
        if let Err(e) = incoming.validate() {
            warn!("AnalogSampler[{}]: rejected config: {}", self.config.name, e);
            return Err(e);
        }

        self.descriptor.name.clone_from(&incoming.name);
        self.config = incoming;
        info!(
            "AnalogSampler[{}]: pin={} rolling_average={} average_size={}",
            self.config.name, self.config.pin, self.config.rolling_average, self.config.average_size
        );

        if persist {
            self.save()?;
        }
        self.configure_input()
    }

    fn save(&mut self) -> Result<()> {
        let json = self.get_config();
        self.storage
            .write(&self.config_path, json.as_bytes())
            .map_err(|e| {
                warn!(
                    "AnalogSampler[{}]: writing {} failed: {}",
                    self.config.name, self.config_path, e
                );
                Error::from(e)
            })?;
        info!("AnalogSampler[{}]: config saved to {}", self.config.name, self.config_path);
        Ok(())
    }
}

/// Pass `reading` through `window` when averaging, otherwise return it as is.
fn acquire(window: &mut SampleWindow, average_size: Option<usize>, reading: i32) -> i32 {
    match average_size {
        Some(size) => window.push(reading, size),
        None => reading,
    }
}

impl<H: AnalogPort, S: StoragePort> Sensor for AnalogSampler<H, S> {
    fn start(&mut self) -> Result<()> {
        AnalogSampler::start(self)
    }

    fn sample(&mut self) -> Result<()> {
        AnalogSampler::sample(self)
    }

    fn get_config(&self) -> String {
        AnalogSampler::get_config(self)
    }

    fn set_config(&mut self, config: &str, persist: bool) -> Result<()> {
        AnalogSampler::set_config(self, config, persist)
    }

    fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    fn values(&self) -> &Readings {
        &self.values
    }
}
