//! Synthetic frame source.
//!
//! Produces small marker-delimited payloads instead of real JPEGs and
//! records every URI assignment and start/stop transition in a shared
//! `StubProbe`. Used by tests and by dry runs of the probe binary.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{anyhow, Result};

use super::{FrameSource, JpegFrame, SourceFactory};
use crate::mode::StreamMode;

#[derive(Debug, Default)]
struct ProbeState {
    assigned_uris: Vec<String>,
    created: usize,
    running: usize,
    max_running: usize,
}

/// Shared view of everything the stub sources of one factory did.
#[derive(Clone, Debug, Default)]
pub struct StubProbe {
    state: Arc<Mutex<ProbeState>>,
}

impl StubProbe {
    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        // A poisoned probe only means a test already panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Every URI assigned to any source of this factory, in order.
    pub fn assigned_uris(&self) -> Vec<String> {
        self.lock().assigned_uris.clone()
    }

    pub fn created(&self) -> usize {
        self.lock().created
    }

    /// Sources currently running.
    pub fn running(&self) -> usize {
        self.lock().running
    }

    /// Highest number of simultaneously running sources ever observed.
    pub fn max_running(&self) -> usize {
        self.lock().max_running
    }
}

pub struct StubSource {
    mode: StreamMode,
    uri: String,
    poll_interval: Duration,
    running: bool,
    frame_count: u64,
    probe: StubProbe,
}

impl StubSource {
    pub fn new(mode: StreamMode, probe: StubProbe) -> Self {
        probe.lock().created += 1;
        Self {
            mode,
            uri: String::new(),
            poll_interval: Duration::ZERO,
            running: false,
            frame_count: 0,
            probe,
        }
    }
}

impl FrameSource for StubSource {
    fn mode(&self) -> StreamMode {
        self.mode
    }

    fn set_target_uri(&mut self, uri: &str) {
        self.uri = uri.to_string();
        self.probe.lock().assigned_uris.push(self.uri.clone());
    }

    fn target_uri(&self) -> &str {
        &self.uri
    }

    fn set_poll_interval(&mut self, interval: Duration) {
        if self.mode == StreamMode::SingleFrame {
            self.poll_interval = interval;
        }
    }

    fn poll_interval(&self) -> Option<Duration> {
        match self.mode {
            StreamMode::SingleFrame => Some(self.poll_interval),
            StreamMode::ContinuousStream => None,
        }
    }

    fn start(&mut self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(anyhow!("stub source has no target uri"));
        }
        if !self.running {
            self.running = true;
            let mut state = self.probe.lock();
            state.running += 1;
            state.max_running = state.max_running.max(state.running);
            log::info!("StubSource: started {} ({})", self.uri, self.mode);
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.probe.lock().running -= 1;
            log::info!("StubSource: stopped {}", self.uri);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn next_frame(&mut self) -> Result<JpegFrame> {
        if !self.running {
            return Err(anyhow!("stub source not started; call start() first"));
        }
        self.frame_count += 1;
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&self.frame_count.to_be_bytes());
        data.extend_from_slice(&[0xFF, 0xD9]);
        Ok(JpegFrame {
            data,
            sequence: self.frame_count,
        })
    }
}

impl Drop for StubSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Factory for `StubSource`s sharing one probe.
#[derive(Clone, Debug, Default)]
pub struct StubSourceFactory {
    probe: StubProbe,
}

impl StubSourceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> StubProbe {
        self.probe.clone()
    }
}

impl SourceFactory for StubSourceFactory {
    fn create(&self, mode: StreamMode) -> Result<Box<dyn FrameSource>> {
        Ok(Box::new(StubSource::new(mode, self.probe.clone())))
    }
}
