use std::io::Read;

use anyhow::{anyhow, Context, Result};

use super::MAX_JPEG_BYTES;

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];
#[cfg_attr(not(feature = "http-sources"), allow(dead_code))]
const CHUNK_BYTES: usize = 8192;

fn find_marker(haystack: &[u8], marker: [u8; 2]) -> Option<usize> {
    haystack.windows(2).position(|w| w == marker)
}

/// Locate the first complete JPEG (SOI..EOI) in `buffer`.
///
/// Returns the start offset and the exclusive end offset.
pub fn find_jpeg_bounds(buffer: &[u8]) -> Option<(usize, usize)> {
    let start = find_marker(buffer, SOI)?;
    let end = find_marker(&buffer[start + 2..], EOI)?;
    Some((start, start + 2 + end + 2))
}

/// Splits a multipart MJPEG body into JPEG frames by marker scanning.
///
/// Part headers and boundaries are skipped implicitly since they never
/// contain SOI markers. Each byte is scanned once: `scanned` is where the
/// next marker search resumes.
#[cfg_attr(not(feature = "http-sources"), allow(dead_code))]
pub(crate) struct MultipartReader<R> {
    reader: R,
    buffer: Vec<u8>,
    frame_start: Option<usize>,
    scanned: usize,
}

#[cfg_attr(not(feature = "http-sources"), allow(dead_code))]
impl<R: Read> MultipartReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(64 * 1024),
            frame_start: None,
            scanned: 0,
        }
    }

    pub(crate) fn read_next_jpeg(&mut self) -> Result<Vec<u8>> {
        let mut chunk = [0u8; CHUNK_BYTES];
        loop {
            if let Some(frame) = self.take_frame() {
                return Ok(frame);
            }
            let read = self.reader.read(&mut chunk).context("read mjpeg chunk")?;
            if read == 0 {
                return Err(anyhow!("mjpeg stream ended"));
            }
            self.buffer.extend_from_slice(&chunk[..read]);
        }
    }

    /// Advance the scan over newly buffered bytes, returning a frame once
    /// its EOI marker is in the buffer.
    fn take_frame(&mut self) -> Option<Vec<u8>> {
        // A marker may straddle the last byte, so that byte is rescanned.
        let resume = self.buffer.len().saturating_sub(1);
        match self.frame_start {
            None => match find_marker(&self.buffer[self.scanned..], SOI) {
                Some(offset) => {
                    let start = self.scanned + offset;
                    self.frame_start = Some(start);
                    self.scanned = start + 2;
                    self.take_frame()
                }
                None => {
                    // Nothing before a possible SOI is needed again.
                    self.buffer.drain(..resume);
                    self.scanned = 0;
                    None
                }
            },
            Some(start) => match find_marker(&self.buffer[self.scanned..], EOI) {
                Some(offset) => {
                    let end = self.scanned + offset + 2;
                    let frame = self.buffer[start..end].to_vec();
                    self.buffer.drain(..end);
                    self.frame_start = None;
                    self.scanned = 0;
                    Some(frame)
                }
                None if self.buffer.len() - start > MAX_JPEG_BYTES => {
                    log::warn!(
                        "mjpeg frame exceeded {} bytes without EOI, resyncing",
                        MAX_JPEG_BYTES
                    );
                    self.buffer.drain(..resume);
                    self.frame_start = None;
                    self.scanned = 0;
                    None
                }
                None => {
                    self.scanned = resume.max(start + 2);
                    None
                }
            },
        }
    }
}
