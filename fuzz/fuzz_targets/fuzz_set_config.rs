//! Fuzz target: `AnalogSampler::set_config`
//!
//! Feeds arbitrary bytes as a configuration document and verifies:
//! - No panics under arbitrary input
//! - A rejected document leaves the configuration untouched
//! - An accepted document always round-trips through `get_config`
//! - Sampling afterwards keeps the window within `AverageSize`
//!
//! cargo fuzz run fuzz_set_config

#![no_main]

use analog_sampler::ports::{AnalogPort, HardwareError, StorageError, StoragePort};
use analog_sampler::{Acquisition, AnalogSampler};
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

// ── In-memory ports for fuzz testing ──────────────────────────

struct CountingAdc(i32);

impl AnalogPort for CountingAdc {
    fn set_pin_input(&mut self, _pin: i32) -> Result<(), HardwareError> {
        Ok(())
    }

    fn read_raw(&mut self, _pin: i32) -> i32 {
        self.0 = self.0.wrapping_add(7) % 4096;
        self.0
    }

    fn read_millivolts(&mut self, _pin: i32) -> i32 {
        self.0 * 3300 / 4096
    }
}

struct MemStore {
    data: HashMap<String, Vec<u8>>,
}

impl StoragePort for MemStore {
    fn exists(&self, path: &str) -> bool {
        self.data.contains_key(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        self.data.get(path).cloned().ok_or(StorageError::NotFound)
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        self.data.insert(path.into(), data.to_vec());
        Ok(())
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = core::str::from_utf8(data) else {
        return;
    };
    let acquisition = if data.len() % 2 == 0 {
        Acquisition::DualChannel
    } else {
        Acquisition::DerivedFromRaw
    };

    let mut sampler = AnalogSampler::new(
        "fuzz",
        1,
        "fuzz.json",
        acquisition,
        CountingAdc(0),
        MemStore { data: HashMap::new() },
    );
    let before = sampler.config().clone();

    match sampler.set_config(doc, true) {
        Err(_) => assert_eq!(sampler.config(), &before, "rejected config mutated state"),
        Ok(()) => {
            let json = sampler.get_config();
            let applied = sampler.config().clone();
            sampler.set_config(&json, false).expect("own config must re-apply");
            assert_eq!(sampler.config(), &applied, "config did not round-trip");

            for _ in 0..(applied.average_size + 2).min(300) {
                let _ = sampler.sample();
            }
            assert!(sampler.raw_window().len() <= applied.average_size);
        }
    }
});
