//! Integration tests for the start → load/save → apply configuration cycle.

use crate::mock_hw::{AdcCall, MockAdc, MockStorage};

use analog_sampler::config::AnalogConfig;
use analog_sampler::error::Error;
use analog_sampler::ports::{HardwareError, StorageError};
use analog_sampler::{Acquisition, AnalogSampler};

const PATH: &str = "/settings/sen/GenericAnalogInput.json";

fn make(storage: MockStorage, acq: Acquisition) -> AnalogSampler<MockAdc, MockStorage> {
    AnalogSampler::new(
        "Generic Analog Input",
        5,
        "GenericAnalogInput.json",
        acq,
        MockAdc::new(),
        storage,
    )
}

// ── start() ───────────────────────────────────────────────────

#[test]
fn first_boot_persists_defaults() {
    let mut s = make(MockStorage::new(), Acquisition::DualChannel);
    s.start().unwrap();

    let stored = s.storage().contents(PATH).expect("defaults written");
    assert_eq!(
        stored,
        r#"{"Name":"Generic Analog Input","Pin":5,"RollingAverage":false,"AverageSize":5}"#
    );
    assert_eq!(s.storage().writes, 1);
}

#[test]
fn first_boot_declares_descriptor() {
    let mut s = make(MockStorage::new(), Acquisition::DualChannel);
    s.start().unwrap();

    let d = s.descriptor();
    assert_eq!(d.name, "Generic Analog Input");
    assert_eq!(d.kind, "analog input");
    assert_eq!(d.parameter_quantity, 2);
    assert_eq!(d.parameters.as_slice(), &["Analog Signal", "ADC Reading"]);
    assert_eq!(d.units.as_slice(), &["mv", "raw"]);
    assert_eq!(s.values().len(), 2);
}

#[test]
fn first_boot_fails_when_storage_full() {
    let mut storage = MockStorage::new();
    storage.fail_writes = true;
    let mut s = make(storage, Acquisition::DualChannel);

    assert_eq!(s.start(), Err(Error::Persistence(StorageError::Full)));
    assert!(s.hardware().input_pins().is_empty());
}

#[test]
fn existing_file_is_loaded_without_rewriting() {
    let storage = MockStorage::with_file(
        PATH,
        r#"{"Name":"Soil moisture","Pin":7,"RollingAverage":true,"AverageSize":10}"#,
    );
    let mut s = make(storage, Acquisition::DualChannel);
    s.start().unwrap();

    let c = s.config();
    assert_eq!(c.name, "Soil moisture");
    assert_eq!(c.pin, 7);
    assert!(c.rolling_average);
    assert_eq!(c.average_size, 10);
    assert_eq!(s.descriptor().name, "Soil moisture");
    assert_eq!(s.storage().writes, 0);
    assert_eq!(s.hardware().input_pins(), vec![7]);
}

#[test]
fn corrupt_file_fails_start_and_keeps_defaults() {
    let storage = MockStorage::with_file(PATH, "{\"Name\":\"x\",");
    let mut s = make(storage, Acquisition::DualChannel);

    assert!(matches!(s.start(), Err(Error::ConfigParse(_))));
    assert_eq!(s.config(), &AnalogConfig::new("Generic Analog Input", 5));
    assert!(s.hardware().calls.is_empty());
}

#[test]
fn legacy_file_loads_scale_in_derived_mode() {
    let storage = MockStorage::with_file(
        PATH,
        r#"{"Name":"Battery","Pin":5,"ADC_Voltage_mv":1100,"ADC_Resolution":1024,"RollingAverage":false,"AverageSize":5}"#,
    );
    let mut s = make(storage, Acquisition::DerivedFromRaw);
    s.start().unwrap();

    assert_eq!(s.adc_scale().voltage_mv, 1100);
    assert_eq!(s.adc_scale().resolution, 1024);
}

// ── set_config() ──────────────────────────────────────────────

#[test]
fn set_config_with_persist_writes_file() {
    let mut s = make(MockStorage::new(), Acquisition::DualChannel);
    s.start().unwrap();

    s.set_config(
        r#"{"Name":"Tank","Pin":6,"RollingAverage":true,"AverageSize":3}"#,
        true,
    )
    .unwrap();

    let stored = AnalogConfig::from_json(s.storage().contents(PATH).unwrap().as_bytes()).unwrap();
    assert_eq!(&stored, s.config());
    assert_eq!(s.hardware().input_pins(), vec![5, 6]);
}

#[test]
fn set_config_without_persist_leaves_file() {
    let mut s = make(MockStorage::new(), Acquisition::DualChannel);
    s.start().unwrap();
    let before = s.storage().contents(PATH);

    s.set_config(
        r#"{"Name":"Tank","Pin":6,"RollingAverage":true,"AverageSize":3}"#,
        false,
    )
    .unwrap();

    assert_eq!(s.storage().contents(PATH), before);
    assert_eq!(s.config().pin, 6);
}

#[test]
fn malformed_json_changes_nothing() {
    let mut s = make(MockStorage::new(), Acquisition::DualChannel);
    s.start().unwrap();
    let before = s.config().clone();
    let calls_before = s.hardware().calls.len();

    for bad in [
        "",
        "not json",
        r#"{"Name":"x","Pin":1,"RollingAverage":true"#,
        r#"{"Name":"x","Pin":1,"RollingAverage":"yes","AverageSize":3}"#,
        r#"{"Name":"x","Pin":1,"RollingAverage":true,"AverageSize":-3}"#,
        r#"[1,2,3]"#,
    ] {
        let result = s.set_config(bad, true);
        assert!(
            matches!(result, Err(Error::ConfigParse(_))),
            "expected parse error for {bad:?}, got {result:?}"
        );
    }

    assert_eq!(s.config(), &before);
    assert_eq!(s.hardware().calls.len(), calls_before);
    assert_eq!(s.storage().writes, 1);
}

#[test]
fn out_of_range_values_rejected_before_mutation() {
    let mut s = make(MockStorage::new(), Acquisition::DerivedFromRaw);
    s.start().unwrap();
    let before = s.config().clone();

    for bad in [
        r#"{"Name":"x","Pin":1,"RollingAverage":true,"AverageSize":0}"#,
        r#"{"Name":"x","Pin":1,"RollingAverage":true,"AverageSize":129}"#,
        r#"{"Name":"","Pin":1,"RollingAverage":true,"AverageSize":3}"#,
        r#"{"Name":"x","Pin":1,"RollingAverage":true,"AverageSize":3,"ADC_Resolution":0}"#,
    ] {
        assert!(matches!(s.set_config(bad, true), Err(Error::Validation(_))));
    }
    assert_eq!(s.config(), &before);
}

#[test]
fn persist_failure_keeps_new_values_in_memory() {
    let mut s = make(MockStorage::new(), Acquisition::DualChannel);
    s.start().unwrap();
    s.storage_mut().fail_writes = true;

    let result = s.set_config(
        r#"{"Name":"Tank","Pin":6,"RollingAverage":true,"AverageSize":3}"#,
        true,
    );

    assert_eq!(result, Err(Error::Persistence(StorageError::Full)));
    assert_eq!(s.config().pin, 6);
    assert_eq!(s.config().average_size, 3);
    // The pin is not reconfigured after a failed write.
    assert_eq!(s.hardware().input_pins(), vec![5]);
}

#[test]
fn pin_setup_failure_is_reported() {
    let mut s = make(MockStorage::new(), Acquisition::DualChannel);
    s.hardware_mut().fail_pin_setup = true;

    let result = s.set_config(
        r#"{"Name":"Tank","Pin":6,"RollingAverage":false,"AverageSize":3}"#,
        false,
    );
    assert_eq!(
        result,
        Err(Error::Hardware(HardwareError::PinConfigFailed(-1)))
    );
    assert_eq!(s.hardware().calls, vec![AdcCall::SetInput(6)]);
}

// ── get_config() ──────────────────────────────────────────────

#[test]
fn get_config_round_trips_through_set_config() {
    let mut a = make(MockStorage::new(), Acquisition::DerivedFromRaw);
    a.set_config(
        r#"{"Name":"Light","Pin":3,"RollingAverage":true,"AverageSize":17,"ADC_Voltage_mv":2500,"ADC_Resolution":8192}"#,
        false,
    )
    .unwrap();

    let mut b = make(MockStorage::new(), Acquisition::DerivedFromRaw);
    b.set_config(&a.get_config(), false).unwrap();

    assert_eq!(a.config(), b.config());
    assert_eq!(a.get_config(), b.get_config());
}

#[test]
fn get_config_omits_legacy_fields_in_dual_mode() {
    let s = make(MockStorage::new(), Acquisition::DualChannel);
    let json = s.get_config();
    assert!(!json.contains("ADC_Voltage_mv"));
    assert!(!json.contains("ADC_Resolution"));
}

#[test]
fn get_config_includes_legacy_fields_in_derived_mode() {
    let s = make(MockStorage::new(), Acquisition::DerivedFromRaw);
    let json = s.get_config();
    assert!(json.contains(r#""ADC_Voltage_mv":3300"#));
    assert!(json.contains(r#""ADC_Resolution":4096"#));
}
