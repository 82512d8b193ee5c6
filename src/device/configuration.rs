use serde::Deserialize;

use crate::mode::StreamMode;

/// Detached parameter bag for `DeviceAdapter::apply_configuration`.
///
/// Holds no logic. Fields a family has no use for must be left empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceConfiguration {
    /// Camera address, `host[:port]`.
    pub source: String,
    pub login: Option<String>,
    pub password: Option<String>,
    /// Milliseconds between frames; 0 lets the camera decide.
    pub frame_interval: i64,
    pub stream_mode: StreamMode,
    pub resolution: Option<String>,
}

impl DeviceConfiguration {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, stream_mode: StreamMode) -> Self {
        self.stream_mode = stream_mode;
        self
    }

    pub fn with_frame_interval(mut self, frame_interval: i64) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    pub fn with_credentials(mut self, login: &str, password: &str) -> Self {
        self.login = Some(login.to_string());
        self.password = Some(password.to_string());
        self
    }

    pub fn with_resolution(mut self, resolution: &str) -> Self {
        self.resolution = Some(resolution.to_string());
        self
    }
}
