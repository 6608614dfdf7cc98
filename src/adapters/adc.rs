//! ADC adapter — implements [`AnalogPort`] for the ESP32-S3 ADC1 unit.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oneshot driver on ADC1, 12 dB attenuation, 12-bit width.
//! Millivolts come from the curve-fitting calibration scheme.  The GPIO is
//! mapped to its ADC channel when the pin is configured as an input.
//! On host/test: readings come from static atomics for injection and pin
//! setup is recorded.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicI32, Ordering};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

use crate::ports::{AnalogPort, HardwareError};

#[cfg(not(target_os = "espidf"))]
static SIM_RAW: AtomicI32 = AtomicI32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_MILLIVOLTS: AtomicI32 = AtomicI32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_raw(raw: i32) {
    SIM_RAW.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_millivolts(mv: i32) {
    SIM_MILLIVOLTS.store(mv, Ordering::Relaxed);
}

/// Concrete ADC1 adapter.
pub struct AdcAdapter {
    #[cfg(target_os = "espidf")]
    unit: adc_oneshot_unit_handle_t,
    #[cfg(target_os = "espidf")]
    cali: adc_cali_handle_t,
    #[cfg(target_os = "espidf")]
    channel: Option<adc_channel_t>,
    #[cfg(not(target_os = "espidf"))]
    input_pins: Vec<i32>,
}

impl AdcAdapter {
    /// Create the ADC1 oneshot unit.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, HardwareError> {
        let init_cfg = adc_oneshot_unit_init_cfg_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
            ..Default::default()
        };
        let mut unit: adc_oneshot_unit_handle_t = core::ptr::null_mut();
        // SAFETY: `unit` is a valid out-pointer; the handle is owned by this
        // adapter and released in Drop.
        let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut unit) };
        if ret != ESP_OK as i32 {
            return Err(HardwareError::PinConfigFailed(ret));
        }

        let cali_cfg = adc_cali_curve_fitting_config_t {
            unit_id: adc_unit_t_ADC_UNIT_1,
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
            ..Default::default()
        };
        let mut cali: adc_cali_handle_t = core::ptr::null_mut();
        // SAFETY: as above; a null handle is tolerated by `read_millivolts`.
        let ret = unsafe { adc_cali_create_scheme_curve_fitting(&cali_cfg, &mut cali) };
        if ret != ESP_OK as i32 {
            log::warn!("AdcAdapter: calibration unavailable (rc={}), mV reads return 0", ret);
            cali = core::ptr::null_mut();
        }

        info!("AdcAdapter: ADC1 oneshot unit ready");
        Ok(Self {
            unit,
            cali,
            channel: None,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, HardwareError> {
        info!("AdcAdapter: simulation backend");
        Ok(Self {
            input_pins: Vec::new(),
        })
    }

    /// Pins put into input mode so far, oldest first.
    #[cfg(not(target_os = "espidf"))]
    pub fn input_pins(&self) -> &[i32] {
        &self.input_pins
    }

    #[cfg(target_os = "espidf")]
    fn raw_on(&self, channel: adc_channel_t) -> i32 {
        let mut raw: i32 = 0;
        // SAFETY: `unit` is valid for the adapter's lifetime and `channel`
        // was configured in `set_pin_input`.
        let ret = unsafe { adc_oneshot_read(self.unit, channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return 0;
        }
        raw.max(0)
    }
}

#[cfg(target_os = "espidf")]
impl AnalogPort for AdcAdapter {
    fn set_pin_input(&mut self, pin: i32) -> Result<(), HardwareError> {
        // SAFETY: plain register configuration on a caller-supplied GPIO.
        let ret = unsafe { gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT) };
        if ret != ESP_OK as i32 {
            return Err(HardwareError::PinConfigFailed(ret));
        }

        let mut unit_id: adc_unit_t = 0;
        let mut channel: adc_channel_t = 0;
        // SAFETY: both out-pointers are valid locals.
        let ret = unsafe { adc_oneshot_io_to_channel(pin, &mut unit_id, &mut channel) };
        if ret != ESP_OK as i32 || unit_id != adc_unit_t_ADC_UNIT_1 {
            return Err(HardwareError::InvalidPin(pin));
        }

        let chan_cfg = adc_oneshot_chan_cfg_t {
            atten: adc_atten_t_ADC_ATTEN_DB_12,
            bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
        };
        // SAFETY: `unit` is valid; channel belongs to ADC1 (checked above).
        let ret = unsafe { adc_oneshot_config_channel(self.unit, channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HardwareError::PinConfigFailed(ret));
        }

        self.channel = Some(channel);
        info!("AdcAdapter: GPIO {} -> ADC1 channel {}", pin, channel);
        Ok(())
    }

    fn read_raw(&mut self, _pin: i32) -> i32 {
        self.channel.map_or(0, |ch| self.raw_on(ch))
    }

    fn read_millivolts(&mut self, _pin: i32) -> i32 {
        let Some(ch) = self.channel else { return 0 };
        if self.cali.is_null() {
            return 0;
        }
        let raw = self.raw_on(ch);
        let mut mv: i32 = 0;
        // SAFETY: `cali` is non-null and owned by this adapter.
        let ret = unsafe { adc_cali_raw_to_voltage(self.cali, raw, &mut mv) };
        if ret != ESP_OK as i32 {
            return 0;
        }
        mv
    }
}

#[cfg(not(target_os = "espidf"))]
impl AnalogPort for AdcAdapter {
    fn set_pin_input(&mut self, pin: i32) -> Result<(), HardwareError> {
        self.input_pins.push(pin);
        Ok(())
    }

    fn read_raw(&mut self, _pin: i32) -> i32 {
        SIM_RAW.load(Ordering::Relaxed)
    }

    fn read_millivolts(&mut self, _pin: i32) -> i32 {
        SIM_MILLIVOLTS.load(Ordering::Relaxed)
    }
}

#[cfg(target_os = "espidf")]
impl Drop for AdcAdapter {
    fn drop(&mut self) {
        // SAFETY: handles were created in `new` and are not used after drop.
        unsafe {
            if !self.cali.is_null() {
                adc_cali_delete_scheme_curve_fitting(self.cali);
            }
            adc_oneshot_del_unit(self.unit);
        }
    }
}
