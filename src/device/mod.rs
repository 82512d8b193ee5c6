//! Device adapters: one variant per camera family.
//!
//! Every family fixes two things statically: which stream modes it can
//! serve, and how endpoint, mode and family parameters turn into a request
//! URI. `DeviceAdapter` wraps a `VideoSource` and re-derives the URI after
//! every accepted mutation.
//!
//! There are two update paths:
//! - single-field setters, each deriving the URI immediately
//! - `apply_configuration`, which applies a whole `DeviceConfiguration` and
//!   derives exactly once
//!
//! Both validate before mutating. A rejected call leaves mode, frame source
//! and URI exactly as they were.

pub mod axis;
mod configuration;
pub mod dlink;
pub mod pixord;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::ingest::{FrameSource, SourceFactory};
use crate::mode::StreamMode;
use crate::source::VideoSource;

pub use configuration::DeviceConfiguration;
pub use pixord::PixordParams;

const BOTH_MODES: &[StreamMode] = &[StreamMode::SingleFrame, StreamMode::ContinuousStream];
const SNAPSHOT_ONLY: &[StreamMode] = &[StreamMode::SingleFrame];

/// Camera family sharing one URL grammar and rule set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum DeviceFamily {
    /// Axis video servers (2400/2401 and compatible `axis-cgi`).
    Axis,
    /// Pixord network cameras with credential and resolution query params.
    Pixord,
    /// D-Link DCS-900 style cameras serving still snapshots only.
    DLink,
}

impl DeviceFamily {
    pub const ALL: [DeviceFamily; 3] = [
        DeviceFamily::Axis,
        DeviceFamily::Pixord,
        DeviceFamily::DLink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DeviceFamily::Axis => "axis",
            DeviceFamily::Pixord => "pixord",
            DeviceFamily::DLink => "dlink",
        }
    }

    pub fn allowed_modes(self) -> &'static [StreamMode] {
        match self {
            DeviceFamily::Axis | DeviceFamily::Pixord => BOTH_MODES,
            DeviceFamily::DLink => SNAPSHOT_ONLY,
        }
    }

    pub fn supports(self, mode: StreamMode) -> bool {
        self.allowed_modes().contains(&mode)
    }

    /// Whether the URL grammar carries login/password and resolution.
    pub fn accepts_credentials(self) -> bool {
        matches!(self, DeviceFamily::Pixord)
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceFamily {
    type Err = ConfigError;

    fn from_str(value: &str) -> std::result::Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "axis" | "axis2400" | "axis2401" => Ok(DeviceFamily::Axis),
            "pixord" => Ok(DeviceFamily::Pixord),
            "dlink" | "d-link" | "dcs900" | "dcs-900" => Ok(DeviceFamily::DLink),
            _ => Err(ConfigError::UnknownFamily(value.to_string())),
        }
    }
}

impl TryFrom<String> for DeviceFamily {
    type Error = ConfigError;

    fn try_from(value: String) -> std::result::Result<Self, ConfigError> {
        value.parse()
    }
}

/// Frames per second requested for a frame interval in milliseconds.
///
/// Zero means no explicit rate. Intervals above one second are clamped to
/// 1000 ms, so the slowest requestable rate is 1 fps.
pub fn fps_for_interval(frame_interval_ms: u64) -> Option<u64> {
    if frame_interval_ms == 0 {
        None
    } else {
        Some(1000 / frame_interval_ms.min(1000))
    }
}

fn validate_interval(ms: i64) -> std::result::Result<u64, ConfigError> {
    u64::try_from(ms).map_err(|_| ConfigError::InvalidInterval(ms))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Like `non_empty`, but keeps surrounding whitespace, which may be part of
/// a secret.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

enum FamilyState {
    Axis,
    Pixord(PixordParams),
    DLink,
}

impl FamilyState {
    fn new(family: DeviceFamily) -> Self {
        match family {
            DeviceFamily::Axis => FamilyState::Axis,
            DeviceFamily::Pixord => FamilyState::Pixord(PixordParams::default()),
            DeviceFamily::DLink => FamilyState::DLink,
        }
    }

    fn family(&self) -> DeviceFamily {
        match self {
            FamilyState::Axis => DeviceFamily::Axis,
            FamilyState::Pixord(_) => DeviceFamily::Pixord,
            FamilyState::DLink => DeviceFamily::DLink,
        }
    }
}

/// A configurable video source for one camera.
pub struct DeviceAdapter {
    state: FamilyState,
    source: VideoSource,
    frame_interval: u64,
}

impl DeviceAdapter {
    /// Create an adapter in single-frame mode with no endpoint.
    pub fn new<F: SourceFactory + 'static>(family: DeviceFamily, factory: F) -> Result<Self> {
        let source = VideoSource::new(Box::new(factory), StreamMode::default())?;
        Ok(Self {
            state: FamilyState::new(family),
            source,
            frame_interval: 0,
        })
    }

    /// Create an adapter and apply `config` to it in one step.
    pub fn from_configuration<F: SourceFactory + 'static>(
        family: DeviceFamily,
        factory: F,
        config: &DeviceConfiguration,
    ) -> Result<Self> {
        let mut adapter = Self::new(family, factory)?;
        adapter.apply_configuration(config)?;
        Ok(adapter)
    }

    pub fn family(&self) -> DeviceFamily {
        self.state.family()
    }

    pub fn mode(&self) -> StreamMode {
        self.source.mode()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.source.endpoint()
    }

    pub fn frame_interval(&self) -> u64 {
        self.frame_interval
    }

    /// Pixord parameters, `None` for families without them.
    pub fn pixord_params(&self) -> Option<&PixordParams> {
        match &self.state {
            FamilyState::Pixord(params) => Some(params),
            _ => None,
        }
    }

    /// URI currently assigned to the frame source.
    pub fn uri(&self) -> &str {
        self.source.uri()
    }

    pub fn frame_source(&self) -> &dyn FrameSource {
        self.source.frame_source()
    }

    pub fn frame_source_mut(&mut self) -> &mut dyn FrameSource {
        self.source.frame_source_mut()
    }

    /// Build the request URI for the current settings without assigning it.
    ///
    /// `None` while no endpoint is set.
    pub fn request_uri(&self) -> Option<String> {
        let endpoint = self.source.endpoint()?;
        let mode = self.source.mode();
        Some(match &self.state {
            FamilyState::Axis => axis::request_uri(endpoint, mode, self.frame_interval),
            FamilyState::Pixord(params) => {
                pixord::request_uri(endpoint, mode, self.frame_interval, params)
            }
            FamilyState::DLink => dlink::request_uri(endpoint),
        })
    }

    /// Recompute the request URI and hand it to the frame source.
    pub fn derive_uri(&mut self) {
        if let Some(uri) = self.request_uri() {
            self.source.assign_uri(&uri);
        }
    }

    /// Store the camera address (`host[:port]`, not validated) and re-derive.
    pub fn set_endpoint(&mut self, endpoint: &str) {
        self.source.set_endpoint(endpoint);
        self.derive_uri();
    }

    /// Switch acquisition mode, replacing the frame source.
    ///
    /// The previous source is stopped before the new one is installed. The
    /// new source is left idle for the streaming layer to start.
    pub fn set_mode(&mut self, mode: StreamMode) -> Result<()> {
        self.check_mode(mode)?;
        if mode == self.source.mode() {
            return Ok(());
        }
        let next = self.source.prepare_source(mode)?;
        self.source.install_source(next);
        self.sync_poll_interval();
        self.derive_uri();
        Ok(())
    }

    /// Set the gap between frames in milliseconds (0 = camera default).
    ///
    /// Single-frame sources pace themselves, so only the poll interval moves.
    /// Streams carry the rate in the URI, which is re-derived.
    pub fn set_frame_interval(&mut self, frame_interval_ms: i64) -> Result<()> {
        let interval = validate_interval(frame_interval_ms).map_err(|err| self.rejected(err))?;
        self.frame_interval = interval;
        match self.source.mode() {
            StreamMode::SingleFrame => self.sync_poll_interval(),
            StreamMode::ContinuousStream => self.derive_uri(),
        }
        Ok(())
    }

    /// Set or clear credentials. Empty strings clear.
    pub fn set_credentials(&mut self, login: Option<&str>, password: Option<&str>) -> Result<()> {
        if !self.family().accepts_credentials() {
            return Err(self.unsupported_setting("login").into());
        }
        if let FamilyState::Pixord(params) = &mut self.state {
            params.login = non_blank(login);
            params.password = non_blank(password);
        }
        self.derive_uri();
        Ok(())
    }

    /// Set or clear the requested resolution. Empty string clears.
    pub fn set_resolution(&mut self, resolution: Option<&str>) -> Result<()> {
        if !self.family().accepts_credentials() {
            return Err(self.unsupported_setting("resolution").into());
        }
        if let FamilyState::Pixord(params) = &mut self.state {
            params.resolution = non_empty(resolution);
        }
        self.derive_uri();
        Ok(())
    }

    /// Apply every field of `config`, then derive the URI once.
    ///
    /// All fields are validated up front. A blank `source` keeps the current
    /// endpoint.
    pub fn apply_configuration(&mut self, config: &DeviceConfiguration) -> Result<()> {
        let family = self.family();
        self.check_mode(config.stream_mode)?;
        let interval =
            validate_interval(config.frame_interval).map_err(|err| self.rejected(err))?;
        let login = non_blank(config.login.as_deref());
        let password = non_blank(config.password.as_deref());
        let resolution = non_empty(config.resolution.as_deref());
        if !family.accepts_credentials() {
            if login.is_some() || password.is_some() {
                return Err(self.unsupported_setting("login").into());
            }
            if resolution.is_some() {
                return Err(self.unsupported_setting("resolution").into());
            }
        }
        let next = if config.stream_mode != self.source.mode() {
            Some(self.source.prepare_source(config.stream_mode)?)
        } else {
            None
        };

        let source = config.source.trim();
        if !source.is_empty() {
            self.source.set_endpoint(source);
        }
        self.frame_interval = interval;
        if let FamilyState::Pixord(params) = &mut self.state {
            params.login = login;
            params.password = password;
            params.resolution = resolution;
        }
        if let Some(next) = next {
            self.source.install_source(next);
        }
        self.sync_poll_interval();
        self.derive_uri();
        Ok(())
    }

    fn check_mode(&self, mode: StreamMode) -> std::result::Result<(), ConfigError> {
        let family = self.family();
        if family.supports(mode) {
            Ok(())
        } else {
            Err(self.rejected(ConfigError::UnsupportedMode { family, mode }))
        }
    }

    fn sync_poll_interval(&mut self) {
        if self.source.mode() == StreamMode::SingleFrame {
            self.source
                .set_poll_interval(Duration::from_millis(self.frame_interval));
        }
    }

    fn unsupported_setting(&self, setting: &'static str) -> ConfigError {
        self.rejected(ConfigError::UnsupportedSetting {
            family: self.family(),
            setting,
        })
    }

    fn rejected(&self, err: ConfigError) -> ConfigError {
        log::warn!(
            "{} adapter ({}): rejected change: {}",
            self.family(),
            self.endpoint().unwrap_or("<no endpoint>"),
            err
        );
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_formula_clamps_to_one_second() {
        assert_eq!(fps_for_interval(0), None);
        assert_eq!(fps_for_interval(1), Some(1000));
        assert_eq!(fps_for_interval(40), Some(25));
        assert_eq!(fps_for_interval(50), Some(20));
        assert_eq!(fps_for_interval(300), Some(3));
        assert_eq!(fps_for_interval(1000), Some(1));
        assert_eq!(fps_for_interval(2000), Some(1));
    }

    #[test]
    fn family_lookup_is_case_insensitive() {
        assert_eq!("Axis2401".parse::<DeviceFamily>(), Ok(DeviceFamily::Axis));
        assert_eq!(" PIXORD ".parse::<DeviceFamily>(), Ok(DeviceFamily::Pixord));
        assert_eq!("dcs-900".parse::<DeviceFamily>(), Ok(DeviceFamily::DLink));
        assert_eq!(
            "sony".parse::<DeviceFamily>(),
            Err(ConfigError::UnknownFamily("sony".to_string()))
        );
    }

    #[test]
    fn allowed_modes_per_family() {
        assert!(DeviceFamily::Axis.supports(StreamMode::ContinuousStream));
        assert!(DeviceFamily::Pixord.supports(StreamMode::ContinuousStream));
        assert!(DeviceFamily::DLink.supports(StreamMode::SingleFrame));
        assert!(!DeviceFamily::DLink.supports(StreamMode::ContinuousStream));
    }

    #[test]
    fn negative_interval_is_invalid() {
        assert_eq!(validate_interval(-1), Err(ConfigError::InvalidInterval(-1)));
        assert_eq!(validate_interval(0), Ok(0));
    }
}
