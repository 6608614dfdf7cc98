//! Sensor subsystem — the generic sensor contract and its implementations.
//!
//! Every sensor exposes a [`SensorDescriptor`] (what it measures) and a
//! [`Readings`] record (the latest values, one slot per parameter). The
//! framework drives sensors through the [`Sensor`] trait only.

pub mod analog;
pub mod window;

use crate::error::Result;

/// Upper bound on the number of parameters a single sensor reports.
pub const MAX_PARAMETERS: usize = 8;

/// Describes what a sensor measures. Populated by the sensor in `start()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorDescriptor {
    pub name: String,
    /// Sensor category, e.g. `"analog input"`.
    pub kind: &'static str,
    pub parameter_quantity: usize,
    pub parameters: heapless::Vec<&'static str, MAX_PARAMETERS>,
    pub units: heapless::Vec<&'static str, MAX_PARAMETERS>,
}

impl SensorDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare the kind and the parameter/unit pairs.  Entries past
    /// [`MAX_PARAMETERS`] are dropped.
    pub fn declare(
        &mut self,
        kind: &'static str,
        parameters: &[&'static str],
        units: &[&'static str],
    ) {
        self.kind = kind;
        self.parameters.clear();
        self.units.clear();
        for &p in parameters.iter().take(MAX_PARAMETERS) {
            let _ = self.parameters.push(p);
        }
        for &u in units.iter().take(MAX_PARAMETERS) {
            let _ = self.units.push(u);
        }
        self.parameter_quantity = self.parameters.len();
    }
}

/// Latest value of each declared parameter, indexed in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readings {
    values: heapless::Vec<f64, MAX_PARAMETERS>,
}

impl Readings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of slots; new slots start at zero.
    pub fn resize(&mut self, len: usize) {
        let _ = self.values.resize(len.min(MAX_PARAMETERS), 0.0);
    }

    /// Overwrite slot `index`.  Writes past the current length are ignored.
    pub fn set(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Lifecycle every sensor in the framework implements.
pub trait Sensor {
    /// Declare the descriptor and load (or create) the persisted config.
    fn start(&mut self) -> Result<()>;

    /// Take one measurement into [`values`](Self::values).
    fn sample(&mut self) -> Result<()>;

    /// Current configuration as a JSON document.
    fn get_config(&self) -> String;

    /// Apply a JSON configuration, optionally persisting it.
    fn set_config(&mut self, config: &str, persist: bool) -> Result<()>;

    fn descriptor(&self) -> &SensorDescriptor;

    fn values(&self) -> &Readings;
}
