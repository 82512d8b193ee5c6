//! Multimode video sources for vendor HTTP cameras.
//!
//! A `DeviceAdapter` turns abstract camera settings (endpoint, stream mode,
//! frame interval, credentials, resolution) into the request URI a given
//! camera family expects, and keeps an owned frame source pointed at it.
//!
//! # Module Structure
//!
//! - `mode`: `StreamMode` (single JPEG snapshots vs MJPEG streaming)
//! - `ingest`: frame source capability, HTTP and synthetic implementations
//! - `source`: `VideoSource`, the single-owner frame source slot
//! - `device`: per-family adapters, `DeviceConfiguration` batch updates
//! - `config`: camera definitions loaded from JSON/TOML and environment
//!
//! Adapters are plain synchronous values. Callers sharing one across threads
//! must serialize access themselves.

pub mod config;
pub mod device;
pub mod error;
pub mod ingest;
pub mod mode;
pub mod source;

pub use config::{CameraSettings, SourcesConfig};
pub use device::{DeviceAdapter, DeviceConfiguration, DeviceFamily, PixordParams};
pub use error::ConfigError;
#[cfg(feature = "http-sources")]
pub use ingest::HttpSourceFactory;
pub use ingest::{FrameSource, JpegFrame, SourceFactory, StubSourceFactory};
pub use mode::StreamMode;
pub use source::VideoSource;
