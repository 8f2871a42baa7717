//! Response content-type validation.

use crate::error::{SseError, SseResult};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use tracing::warn;

/// Whether a Content-Type value names an event stream.
///
/// Parameters such as `charset` are ignored.
pub fn is_event_stream(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|parsed| parsed.essence_str() == mime::TEXT_EVENT_STREAM.essence_str())
        .unwrap_or(false)
}

/// Fail unless the headers declare `text/event-stream`. A missing header fails.
pub fn check_content_type(headers: &HeaderMap) -> SseResult<()> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default();

    if is_event_stream(&content_type) {
        Ok(())
    } else {
        warn!(content_type = %content_type, "Response is not an event stream");
        Err(SseError::content_type(content_type))
    }
}
