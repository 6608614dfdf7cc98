//! Analog sampler firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  AdcAdapter (AnalogPort)   FlashStorage (StoragePort) │
//! │  ────────────── Port Trait Boundary ───────────────   │
//! │            AnalogSampler (pure logic)                 │
//! │     config load/save · rolling average · mV           │
//! └──────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use analog_sampler::adapters::adc::AdcAdapter;
use analog_sampler::adapters::flash::{self, FlashStorage};
use analog_sampler::config::DEFAULT_CONFIG_FILE;
use analog_sampler::pins;
use analog_sampler::{Acquisition, AnalogSampler};

const SAMPLE_PERIOD: Duration = Duration::from_millis(1000);

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Analog sampler v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    flash::mount().map_err(|e| anyhow::anyhow!("flash mount: {e}"))?;
    let storage = FlashStorage::new(flash::MOUNT_POINT);
    let adc = AdcAdapter::new().map_err(|e| anyhow::anyhow!("ADC init: {e}"))?;

    // ── 3. Sensor ─────────────────────────────────────────────
    let mut sensor = AnalogSampler::new(
        "Generic Analog Input",
        pins::ANALOG_INPUT_GPIO,
        DEFAULT_CONFIG_FILE,
        Acquisition::DualChannel,
        adc,
        storage,
    );
    sensor.start().context("sensor start")?;
    info!("Config: {}", sensor.get_config());

    // ── 4. Sampling loop ──────────────────────────────────────
    loop {
        match sensor.sample() {
            Ok(()) => {
                let d = sensor.descriptor();
                let v = sensor.values();
                for (i, (name, unit)) in d.parameters.iter().zip(d.units.iter()).enumerate() {
                    info!("{}: {} = {} {}", d.name, name, v.get(i).unwrap_or_default(), unit);
                }
            }
            Err(e) => warn!("sample failed: {}", e),
        }
        std::thread::sleep(SAMPLE_PERIOD);
    }
}
