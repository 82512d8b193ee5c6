//! D-Link DCS-900 style cameras. Snapshots only; pacing is left entirely to
//! the polling source.

pub fn request_uri(endpoint: &str) -> String {
    format!("http://{}/cgi-bin/video.jpg", endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uri() {
        assert_eq!(request_uri("10.1.1.9"), "http://10.1.1.9/cgi-bin/video.jpg");
    }
}
