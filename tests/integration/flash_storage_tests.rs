//! End-to-end tests against the real filesystem adapter and the simulated ADC.

use analog_sampler::adapters::adc::{self, AdcAdapter};
use analog_sampler::adapters::flash::FlashStorage;
use analog_sampler::ports::StoragePort;
use analog_sampler::{Acquisition, AnalogSampler};

fn scratch_root(name: &str) -> std::path::PathBuf {
    let root = std::env::temp_dir().join(format!(
        "analog-sampler-it-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&root);
    root
}

#[test]
fn defaults_survive_a_reboot() {
    let root = scratch_root("reboot");

    let mut first = AnalogSampler::new(
        "Generic Analog Input",
        5,
        "GenericAnalogInput.json",
        Acquisition::DualChannel,
        AdcAdapter::new().unwrap(),
        FlashStorage::new(&root),
    );
    first.start().unwrap();
    first
        .set_config(
            r#"{"Name":"Pot","Pin":6,"RollingAverage":true,"AverageSize":4}"#,
            true,
        )
        .unwrap();
    assert!(root.join("settings/sen/GenericAnalogInput.json").is_file());

    let mut second = AnalogSampler::new(
        "Generic Analog Input",
        5,
        "GenericAnalogInput.json",
        Acquisition::DualChannel,
        AdcAdapter::new().unwrap(),
        FlashStorage::new(&root),
    );
    second.start().unwrap();
    assert_eq!(second.config(), first.config());
    assert_eq!(second.hardware().input_pins(), &[6]);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn simulated_adc_feeds_the_sampler() {
    let root = scratch_root("sim");
    let mut s = AnalogSampler::new(
        "sim",
        5,
        "sim.json",
        Acquisition::DualChannel,
        AdcAdapter::new().unwrap(),
        FlashStorage::new(&root),
    );
    s.start().unwrap();
    assert!(s.storage().exists("/settings/sen/sim.json"));

    adc::sim_set_raw(3000);
    adc::sim_set_millivolts(2400);
    s.sample().unwrap();
    assert_eq!(s.values().as_slice(), &[2400.0, 3000.0]);

    let _ = std::fs::remove_dir_all(&root);
}
