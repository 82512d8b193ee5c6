use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Acquisition strategy of a video source.
///
/// `SingleFrame` polls still JPEG snapshots; `ContinuousStream` reads an
/// MJPEG multipart stream. Each mode needs a different frame source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum StreamMode {
    #[default]
    SingleFrame,
    ContinuousStream,
}

impl StreamMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamMode::SingleFrame => "jpeg",
            StreamMode::ContinuousStream => "mjpeg",
        }
    }
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "single" | "single-frame" => Ok(StreamMode::SingleFrame),
            "mjpeg" | "mjpg" | "stream" | "continuous-stream" => Ok(StreamMode::ContinuousStream),
            other => Err(anyhow::anyhow!(
                "unknown stream mode '{}'; expected jpeg or mjpeg",
                other
            )),
        }
    }
}

impl TryFrom<String> for StreamMode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> anyhow::Result<Self> {
        value.parse()
    }
}
