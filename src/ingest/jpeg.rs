//! HTTP snapshot source.
//!
//! `JpegSource` issues one GET per frame against the target URI and sleeps
//! between requests so that consecutive frames are at least one poll
//! interval apart. Zero means "as fast as the camera answers".

use std::io::Read;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};

use super::{FrameSource, JpegFrame, MAX_JPEG_BYTES};
use crate::mode::StreamMode;

pub struct JpegSource {
    agent: ureq::Agent,
    uri: String,
    poll_interval: Duration,
    running: bool,
    last_frame_at: Option<Instant>,
    frame_count: u64,
}

impl JpegSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            uri: String::new(),
            poll_interval: Duration::ZERO,
            running: false,
            last_frame_at: None,
            frame_count: 0,
        }
    }

    fn wait_for_slot(&self) {
        if let Some(last) = self.last_frame_at {
            let elapsed = last.elapsed();
            if elapsed < self.poll_interval {
                std::thread::sleep(self.poll_interval - elapsed);
            }
        }
    }
}

impl FrameSource for JpegSource {
    fn mode(&self) -> StreamMode {
        StreamMode::SingleFrame
    }

    fn set_target_uri(&mut self, uri: &str) {
        self.uri = uri.to_string();
    }

    fn target_uri(&self) -> &str {
        &self.uri
    }

    fn set_poll_interval(&mut self, interval: Duration) {
        self.poll_interval = interval;
    }

    fn poll_interval(&self) -> Option<Duration> {
        Some(self.poll_interval)
    }

    fn start(&mut self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(anyhow!("jpeg source has no target uri"));
        }
        self.running = true;
        self.last_frame_at = None;
        log::info!("JpegSource: polling {} every {:?}", self.uri, self.poll_interval);
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            log::info!("JpegSource: stopped {}", self.uri);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn next_frame(&mut self) -> Result<JpegFrame> {
        if !self.running {
            return Err(anyhow!("jpeg source not started; call start() first"));
        }
        self.wait_for_slot();

        let response = self
            .agent
            .get(&self.uri)
            .call()
            .with_context(|| format!("fetch jpeg snapshot from {}", self.uri))?;
        let mut data = Vec::new();
        response
            .into_reader()
            .take(MAX_JPEG_BYTES as u64 + 1)
            .read_to_end(&mut data)
            .context("read jpeg snapshot")?;
        if data.is_empty() {
            return Err(anyhow!("empty jpeg snapshot"));
        }
        if data.len() > MAX_JPEG_BYTES {
            return Err(anyhow!("jpeg snapshot exceeded {} bytes", MAX_JPEG_BYTES));
        }

        self.frame_count += 1;
        self.last_frame_at = Some(Instant::now());
        Ok(JpegFrame {
            data,
            sequence: self.frame_count,
        })
    }
}
