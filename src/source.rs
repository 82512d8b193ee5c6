//! Frame source slot shared by every device adapter.
//!
//! `VideoSource` owns exactly one frame source, the stream mode it was built
//! for, and the logical endpoint. It knows nothing about URL grammar; the
//! adapter computes URIs and hands them to `assign_uri`.

use std::time::Duration;

use anyhow::Result;

use crate::ingest::{FrameSource, SourceFactory};
use crate::mode::StreamMode;

pub struct VideoSource {
    factory: Box<dyn SourceFactory>,
    frame_source: Box<dyn FrameSource>,
    mode: StreamMode,
    endpoint: Option<String>,
}

impl VideoSource {
    /// Build the slot with a fresh source for `mode` and no endpoint.
    pub fn new(factory: Box<dyn SourceFactory>, mode: StreamMode) -> Result<Self> {
        let frame_source = factory.create(mode)?;
        Ok(Self {
            factory,
            frame_source,
            mode,
            endpoint: None,
        })
    }

    pub fn mode(&self) -> StreamMode {
        self.mode
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub(crate) fn set_endpoint(&mut self, endpoint: &str) {
        self.endpoint = Some(endpoint.to_string());
    }

    /// URI currently assigned to the frame source (empty until derived).
    pub fn uri(&self) -> &str {
        self.frame_source.target_uri()
    }

    pub fn frame_source(&self) -> &dyn FrameSource {
        self.frame_source.as_ref()
    }

    /// Mutable access for the streaming layer (start, stop, next_frame).
    pub fn frame_source_mut(&mut self) -> &mut dyn FrameSource {
        self.frame_source.as_mut()
    }

    /// Build a source for `mode` without touching the current one.
    ///
    /// Split from `install_source` so a factory failure leaves the slot intact.
    pub(crate) fn prepare_source(&self, mode: StreamMode) -> Result<Box<dyn FrameSource>> {
        self.factory.create(mode)
    }

    /// Stop and drop the current source, then install `next`.
    pub(crate) fn install_source(&mut self, next: Box<dyn FrameSource>) {
        debug_assert!(!next.is_running());
        self.frame_source.stop();
        let previous = std::mem::replace(&mut self.frame_source, next);
        drop(previous);
        self.mode = self.frame_source.mode();
        log::info!(
            "video source: switched to {} ({})",
            self.mode,
            self.endpoint.as_deref().unwrap_or("<no endpoint>")
        );
    }

    pub(crate) fn assign_uri(&mut self, uri: &str) {
        log::debug!("video source: target uri {}", uri);
        self.frame_source.set_target_uri(uri);
    }

    pub(crate) fn set_poll_interval(&mut self, interval: Duration) {
        self.frame_source.set_poll_interval(interval);
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        self.frame_source.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::StubSourceFactory;

    #[test]
    fn new_slot_has_idle_source_for_mode() -> Result<()> {
        let factory = Box::new(StubSourceFactory::new());
        let slot = VideoSource::new(factory, StreamMode::ContinuousStream)?;
        assert_eq!(slot.mode(), StreamMode::ContinuousStream);
        assert_eq!(slot.frame_source().mode(), StreamMode::ContinuousStream);
        assert!(!slot.frame_source().is_running());
        assert_eq!(slot.endpoint(), None);
        assert_eq!(slot.uri(), "");
        Ok(())
    }

    #[test]
    fn install_stops_previous_source() -> Result<()> {
        let factory = StubSourceFactory::new();
        let probe = factory.probe();
        let mut slot = VideoSource::new(Box::new(factory), StreamMode::SingleFrame)?;
        slot.set_endpoint("cam");
        slot.assign_uri("http://cam/still");
        slot.frame_source_mut().start()?;

        let next = slot.prepare_source(StreamMode::ContinuousStream)?;
        assert_eq!(probe.running(), 1);
        slot.install_source(next);

        assert_eq!(probe.running(), 0);
        assert_eq!(slot.mode(), StreamMode::ContinuousStream);
        assert_eq!(slot.uri(), "");
        Ok(())
    }
}
