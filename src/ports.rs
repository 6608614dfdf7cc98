//! Port traits — the boundary between the sampler and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AnalogSampler (domain)
//! ```
//!
//! Driven adapters (ADC, file storage) implement these traits. The
//! [`AnalogSampler`](crate::sensors::analog::AnalogSampler) is generic over
//! them, so the sampling logic never touches hardware directly.

// ───────────────────────────────────────────────────────────────
// Analog port (driven adapter: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Analog input hardware.
///
/// One interface serves both acquisition strategies: a derive-from-raw
/// sampler only ever calls [`read_raw`](Self::read_raw), a dual-channel
/// sampler also calls [`read_millivolts`](Self::read_millivolts).
/// Reads are blocking and assumed infallible at this layer.
pub trait AnalogPort {
    /// Put `pin` into input mode.
    fn set_pin_input(&mut self, pin: i32) -> Result<(), HardwareError>;

    /// Unconverted ADC count for `pin`.
    fn read_raw(&mut self, pin: i32) -> i32;

    /// Calibrated reading for `pin` in millivolts, as reported natively by
    /// the hardware layer.
    fn read_millivolts(&mut self, pin: i32) -> i32;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ flash filesystem)
// ───────────────────────────────────────────────────────────────

/// Whole-file storage addressed by absolute path (`/settings/sen/<file>`).
///
/// Writes replace the file contents entirely.
pub trait StoragePort {
    /// Check whether a file exists without reading it.
    fn exists(&self, path: &str) -> bool;

    /// Read the full contents of a file.
    fn read(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Replace the contents of a file, creating it if needed.
    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested file does not exist.
    NotFound,
    /// Filesystem partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

/// Errors from [`AnalogPort::set_pin_input`].
///
/// The ESP32 and simulation backends never fail pin setup; the variants
/// exist for backends that can.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    /// The pin is not routed to an ADC channel on this chip.
    InvalidPin(i32),
    /// The driver rejected the GPIO configuration (ESP-IDF return code).
    PinConfigFailed(i32),
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "file not found"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPin(pin) => write!(f, "GPIO {} has no ADC channel", pin),
            Self::PinConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}
