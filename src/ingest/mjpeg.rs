//! HTTP MJPEG source.
//!
//! Opens the target URI once on `start` and splits the
//! `multipart/x-mixed-replace` body into frames. Frame rate is the camera's
//! business (usually requested through a query parameter in the URI).

use std::io::Read;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use super::multipart::MultipartReader;
use super::{FrameSource, JpegFrame};
use crate::mode::StreamMode;

pub struct MjpegSource {
    agent: ureq::Agent,
    uri: String,
    stream: Option<MultipartReader<Box<dyn Read + Send + Sync>>>,
    running: bool,
    frame_count: u64,
}

impl MjpegSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            // Only the connect phase is bounded; the body is read indefinitely.
            agent: ureq::AgentBuilder::new().timeout_connect(timeout).build(),
            uri: String::new(),
            stream: None,
            running: false,
            frame_count: 0,
        }
    }

    fn connect(&mut self) -> Result<()> {
        let response = self
            .agent
            .get(&self.uri)
            .call()
            .with_context(|| format!("connect to mjpeg stream {}", self.uri))?;
        let content_type = response.header("Content-Type").unwrap_or("");
        if !content_type.to_lowercase().contains("multipart") {
            return Err(anyhow!(
                "expected a multipart mjpeg response from {}, got '{}'",
                self.uri,
                content_type
            ));
        }
        self.stream = Some(MultipartReader::new(response.into_reader()));
        log::info!("MjpegSource: connected to {}", self.uri);
        Ok(())
    }
}

impl FrameSource for MjpegSource {
    fn mode(&self) -> StreamMode {
        StreamMode::ContinuousStream
    }

    fn set_target_uri(&mut self, uri: &str) {
        if self.uri != uri {
            self.uri = uri.to_string();
            // Reconnect lazily with the new parameters.
            self.stream = None;
        }
    }

    fn target_uri(&self) -> &str {
        &self.uri
    }

    fn start(&mut self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(anyhow!("mjpeg source has no target uri"));
        }
        self.connect()?;
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stream = None;
            log::info!("MjpegSource: stopped {}", self.uri);
        }
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn next_frame(&mut self) -> Result<JpegFrame> {
        if !self.running {
            return Err(anyhow!("mjpeg source not started; call start() first"));
        }
        if self.stream.is_none() {
            self.connect()?;
        }
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| anyhow!("mjpeg source lost its connection"))?;
        let data = match stream.read_next_jpeg() {
            Ok(data) => data,
            Err(err) => {
                self.stream = None;
                return Err(err);
            }
        };
        self.frame_count += 1;
        Ok(JpegFrame {
            data,
            sequence: self.frame_count,
        })
    }
}
