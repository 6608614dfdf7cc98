//! Unified error types for the analog sampler.
//!
//! A single `Error` enum that every layer converts into, so the sensor
//! lifecycle (`start`, `set_config`, `sample`) reports one uniform outcome.
//! All variants are `Copy`; parser detail is logged where it happens and
//! only its classification travels with the error.

use core::fmt;

use serde_json::error::Category;

use crate::ports::{HardwareError, StorageError};

// ---------------------------------------------------------------------------
// Top-level sampler error
// ---------------------------------------------------------------------------

/// Every fallible sampler operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The configuration document is not valid JSON or has the wrong shape.
    ConfigParse(ParseError),
    /// The configuration parsed, but a field is outside its allowed range.
    Validation(&'static str),
    /// The storage backend could not read or write the config file.
    Persistence(StorageError),
    /// The pin could not be configured as an input.
    Hardware(HardwareError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(e) => write!(f, "config parse: {e}"),
            Self::Validation(msg) => write!(f, "config validation: {msg}"),
            Self::Persistence(e) => write!(f, "persistence: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Location and class of a JSON deserialization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub category: Category,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.category {
            Category::Io => "I/O error",
            Category::Syntax => "syntax error",
            Category::Data => "invalid data",
            Category::Eof => "unexpected end of input",
        };
        write!(f, "{} at line {} column {}", kind, self.line, self.column)
    }
}

impl From<&serde_json::Error> for ParseError {
    fn from(e: &serde_json::Error) -> Self {
        Self {
            category: e.classify(),
            line: e.line(),
            column: e.column(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigParse(ParseError::from(&e))
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Persistence(e)
    }
}

impl From<HardwareError> for Error {
    fn from(e: HardwareError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
