//! Frame sources.
//!
//! A frame source is handed a target URI and, once started, yields JPEG
//! frames from it. Two kinds exist, matching the stream modes:
//! - single-frame sources poll one snapshot per `next_frame` call and pace
//!   themselves with a poll interval
//! - streaming sources hold one HTTP response open and split the multipart
//!   body into frames; the camera controls the rate
//!
//! Sources never decode. Frames leave as raw JPEG bytes.
//!
//! Adapters obtain sources through a `SourceFactory` so the acquisition
//! backend (HTTP, synthetic) stays a deployment decision.

#[cfg(feature = "http-sources")]
pub mod jpeg;
#[cfg(feature = "http-sources")]
pub mod mjpeg;
mod multipart;
pub mod stub;

use std::time::Duration;

use anyhow::Result;

use crate::mode::StreamMode;

#[cfg(feature = "http-sources")]
pub use jpeg::JpegSource;
#[cfg(feature = "http-sources")]
pub use mjpeg::MjpegSource;
pub use multipart::find_jpeg_bounds;
pub use stub::{StubProbe, StubSource, StubSourceFactory};

/// Upper bound for a single JPEG frame held in memory.
pub const MAX_JPEG_BYTES: usize = 5 * 1024 * 1024;

/// One JPEG frame as delivered by the camera.
#[derive(Clone, Debug)]
pub struct JpegFrame {
    pub data: Vec<u8>,
    /// Per-source counter, starting at 1.
    pub sequence: u64,
}

/// Capability that acquires frames from a target URI.
pub trait FrameSource: Send {
    /// Mode this source implements. Never changes for an instance.
    fn mode(&self) -> StreamMode;

    /// Point the source at a new URI. A running streaming source reconnects
    /// on the next frame request.
    fn set_target_uri(&mut self, uri: &str);

    /// Current target URI (empty until assigned).
    fn target_uri(&self) -> &str;

    /// Pacing hint for single-frame sources. Streaming sources ignore it.
    fn set_poll_interval(&mut self, _interval: Duration) {}

    fn poll_interval(&self) -> Option<Duration> {
        None
    }

    fn start(&mut self) -> Result<()>;

    /// Stop acquisition and release any connection. Idempotent.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Block until the next frame is available.
    fn next_frame(&mut self) -> Result<JpegFrame>;
}

/// Creates the frame source matching a stream mode.
pub trait SourceFactory: Send {
    fn create(&self, mode: StreamMode) -> Result<Box<dyn FrameSource>>;
}

/// Factory producing the blocking HTTP sources.
#[cfg(feature = "http-sources")]
#[derive(Clone, Debug)]
pub struct HttpSourceFactory {
    pub timeout: Duration,
}

#[cfg(feature = "http-sources")]
impl Default for HttpSourceFactory {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(feature = "http-sources")]
impl SourceFactory for HttpSourceFactory {
    fn create(&self, mode: StreamMode) -> Result<Box<dyn FrameSource>> {
        let source: Box<dyn FrameSource> = match mode {
            StreamMode::SingleFrame => Box::new(JpegSource::new(self.timeout)),
            StreamMode::ContinuousStream => Box::new(MjpegSource::new(self.timeout)),
        };
        Ok(source)
    }
}

impl SourceFactory for Box<dyn SourceFactory> {
    fn create(&self, mode: StreamMode) -> Result<Box<dyn FrameSource>> {
        (**self).create(mode)
    }
}
