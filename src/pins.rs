//! GPIO assignments for the sensor board.

/// Analog input sampled by the default sensor. ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const ANALOG_INPUT_GPIO: i32 = 5;
