//! Validation errors raised synchronously by adapter setters.
//!
//! Transport failures (bad endpoint, unreachable camera) are not represented
//! here. They surface from the frame source when it connects.

use std::fmt;

use crate::device::DeviceFamily;
use crate::mode::StreamMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The family cannot acquire frames in this mode.
    UnsupportedMode {
        family: DeviceFamily,
        mode: StreamMode,
    },
    /// Frame interval below zero milliseconds.
    InvalidInterval(i64),
    /// The family URL grammar has no slot for this setting.
    UnsupportedSetting {
        family: DeviceFamily,
        setting: &'static str,
    },
    /// No adapter variant is registered under this identifier.
    UnknownFamily(String),
}

impl ConfigError {
    /// Stable machine-readable code, suitable for log filters.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::UnsupportedMode { .. } => "UNSUPPORTED_MODE",
            ConfigError::InvalidInterval(_) => "INVALID_INTERVAL",
            ConfigError::UnsupportedSetting { .. } => "UNSUPPORTED_SETTING",
            ConfigError::UnknownFamily(_) => "UNKNOWN_FAMILY",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnsupportedMode { family, mode } => write!(
                f,
                "{}: {} cameras do not support stream mode {}",
                self.code(),
                family,
                mode
            ),
            ConfigError::InvalidInterval(ms) => write!(
                f,
                "{}: frame interval must be >= 0 ms, got {}",
                self.code(),
                ms
            ),
            ConfigError::UnsupportedSetting { family, setting } => write!(
                f,
                "{}: {} cameras have no '{}' parameter",
                self.code(),
                family,
                setting
            ),
            ConfigError::UnknownFamily(name) => {
                write!(f, "{}: unknown device family '{}'", self.code(), name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
