//! Pixord network cameras.
//!
//! Snapshot and stream CGIs take the same query contract: optional
//! `resolution`, `user`, `pwd`, in that order, form-encoded. Streams also
//! take `fps`, derived from the frame interval like Axis `des_fps`.

use url::form_urlencoded;

use super::fps_for_interval;
use crate::mode::StreamMode;

/// Credentials and resolution carried in Pixord request URIs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixordParams {
    pub login: Option<String>,
    pub password: Option<String>,
    pub resolution: Option<String>,
}

pub fn request_uri(
    endpoint: &str,
    mode: StreamMode,
    frame_interval_ms: u64,
    params: &PixordParams,
) -> String {
    let path = match mode {
        StreamMode::SingleFrame => "cgi-bin/getimage.cgi",
        StreamMode::ContinuousStream => "cgi-bin/getstream.cgi",
    };

    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut has_query = false;
    for (key, value) in [
        ("resolution", &params.resolution),
        ("user", &params.login),
        ("pwd", &params.password),
    ] {
        if let Some(value) = value {
            query.append_pair(key, value);
            has_query = true;
        }
    }
    if mode == StreamMode::ContinuousStream {
        if let Some(fps) = fps_for_interval(frame_interval_ms) {
            query.append_pair("fps", &fps.to_string());
            has_query = true;
        }
    }

    let mut uri = format!("http://{}/{}", endpoint, path);
    if has_query {
        uri.push('?');
        uri.push_str(&query.finish());
    }
    uri
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(login: &str, password: &str, resolution: &str) -> PixordParams {
        PixordParams {
            login: Some(login.to_string()),
            password: Some(password.to_string()),
            resolution: Some(resolution.to_string()),
        }
    }

    #[test]
    fn bare_uris_without_parameters() {
        let empty = PixordParams::default();
        assert_eq!(
            request_uri("px", StreamMode::SingleFrame, 100, &empty),
            "http://px/cgi-bin/getimage.cgi"
        );
        assert_eq!(
            request_uri("px", StreamMode::ContinuousStream, 0, &empty),
            "http://px/cgi-bin/getstream.cgi"
        );
    }

    #[test]
    fn query_order_and_stream_rate() {
        let p = params("admin", "secret", "640x480");
        assert_eq!(
            request_uri("px", StreamMode::SingleFrame, 100, &p),
            "http://px/cgi-bin/getimage.cgi?resolution=640x480&user=admin&pwd=secret"
        );
        assert_eq!(
            request_uri("px", StreamMode::ContinuousStream, 100, &p),
            "http://px/cgi-bin/getstream.cgi?resolution=640x480&user=admin&pwd=secret&fps=10"
        );
    }

    #[test]
    fn credentials_are_form_encoded() {
        let p = PixordParams {
            login: Some("ops team".to_string()),
            password: Some("p&ss=1".to_string()),
            resolution: None,
        };
        assert_eq!(
            request_uri("px", StreamMode::SingleFrame, 0, &p),
            "http://px/cgi-bin/getimage.cgi?user=ops+team&pwd=p%26ss%3D1"
        );
    }
}
