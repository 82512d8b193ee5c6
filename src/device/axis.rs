//! Axis video servers (`axis-cgi` grammar).

use super::fps_for_interval;
use crate::mode::StreamMode;

/// `http://<endpoint>/axis-cgi/jpg/image.cgi` for snapshots,
/// `http://<endpoint>/axis-cgi/mjpg/video.cgi[?des_fps=N]` for streams.
pub fn request_uri(endpoint: &str, mode: StreamMode, frame_interval_ms: u64) -> String {
    match mode {
        StreamMode::SingleFrame => format!("http://{}/axis-cgi/jpg/image.cgi", endpoint),
        StreamMode::ContinuousStream => {
            let mut uri = format!("http://{}/axis-cgi/mjpg/video.cgi", endpoint);
            if let Some(fps) = fps_for_interval(frame_interval_ms) {
                uri.push_str(&format!("?des_fps={}", fps));
            }
            uri
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uri_ignores_interval() {
        assert_eq!(
            request_uri("cam:8080", StreamMode::SingleFrame, 50),
            "http://cam:8080/axis-cgi/jpg/image.cgi"
        );
    }

    #[test]
    fn stream_uri_carries_desired_fps() {
        assert_eq!(
            request_uri("cam", StreamMode::ContinuousStream, 50),
            "http://cam/axis-cgi/mjpg/video.cgi?des_fps=20"
        );
        assert_eq!(
            request_uri("cam", StreamMode::ContinuousStream, 0),
            "http://cam/axis-cgi/mjpg/video.cgi"
        );
        assert_eq!(
            request_uri("cam", StreamMode::ContinuousStream, 2000),
            "http://cam/axis-cgi/mjpg/video.cgi?des_fps=1"
        );
    }
}
