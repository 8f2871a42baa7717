//! Blocking event stream connections.
//!
//! Requires the `blocking` feature. Must not be used from inside an async
//! runtime; use [`connect`](crate::connect) there instead.

use crate::config::ConnectConfig;
use crate::content_type::check_content_type;
use crate::error::{SseError, SseResult};
use bytes::Bytes;
use reqwest::blocking::{Client, Response};
use reqwest::header::HeaderMap;
use reqwest::{IntoUrl, StatusCode};
use serdes_sse_core::{ReaderChunks, SseIter};
use std::io;
use std::iter::Map;
use tracing::debug;

/// Blocking response body as a chunk iterator.
pub type ChunkIter = Map<ReaderChunks<Response>, fn(io::Result<Bytes>) -> SseResult<Bytes>>;

/// Iterator of decoded events from a blocking response body.
pub type EventIter = SseIter<ChunkIter>;

/// A blocking HTTP response that is expected to carry an event stream.
///
/// Blocking counterpart of [`crate::EventSource`]. The constructors and
/// accessors behave identically; only [`into_events`](Self::into_events)
/// differs, reading the body through [`std::io::Read`].
#[derive(Debug)]
pub struct EventSource {
    response: Response,
    last_event_id: Option<String>,
}

/// Same accessors as [`crate::EventSource`], over a blocking response.
#[allow(missing_docs)]
impl EventSource {
    pub fn new(response: Response) -> Self {
        Self {
            response,
            last_event_id: None,
        }
    }

    pub fn with_last_event_id(mut self, id: impl Into<String>) -> Self {
        self.last_event_id = Some(id.into());
        self
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    pub fn check_content_type(&self) -> SseResult<()> {
        check_content_type(self.response.headers())
    }

    pub fn into_response(self) -> Response {
        self.response
    }
}

impl EventSource {

    /// Validate the content type and start decoding the body.
    ///
    /// Each `next` call blocks until the body yields more bytes. Dropping
    /// the iterator closes the connection.
    pub fn into_events(self) -> SseResult<EventIter> {
        self.check_content_type()?;

        let chunks: ChunkIter =
            ReaderChunks::new(self.response).map(lift_io_error as fn(_) -> _);
        Ok(match self.last_event_id {
            Some(id) => SseIter::with_last_event_id(chunks, id),
            None => SseIter::new(chunks),
        })
    }
}

fn lift_io_error(chunk: io::Result<Bytes>) -> SseResult<Bytes> {
    chunk.map_err(SseError::from)
}

/// Open an event stream, blocking until the response headers arrive.
pub fn connect(
    client: &Client,
    url: impl IntoUrl,
    config: ConnectConfig,
) -> SseResult<EventSource> {
    let headers = config.header_map()?;

    let mut builder = client.request(config.method, url).headers(headers);
    if let Some(body) = config.body {
        builder = builder.body(body);
    }
    let request = builder.build()?;

    debug!(method = %request.method(), url = %request.url(), "Opening event stream");

    let response = client.execute(request)?;
    debug!(status = %response.status(), "Event stream response received");

    let source = EventSource::new(response);
    Ok(match config.last_event_id {
        Some(id) => source.with_last_event_id(id),
        None => source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serdes_sse_core::ServerSentEvent;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test(flavor = "multi_thread")]
    async fn test_blocking_connect_and_iterate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/events"))
            .and(header("accept", "text/event-stream"))
            .and(header("last-event-id", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: a\n\nid: 3\ndata: b\n\ndata: unterminated",
                "text/event-stream",
            ))
            .mount(&server)
            .await;
        let url = format!("{}/events", server.uri());

        let (events, last_event_id) = tokio::task::spawn_blocking(move || {
            let config = ConnectConfig::new().last_event_id("2");
            let mut events = connect(&Client::new(), url, config)
                .unwrap()
                .into_events()
                .unwrap();
            let decoded: Vec<_> = events.by_ref().map(Result::unwrap).collect();
            (decoded, events.last_event_id().to_string())
        })
        .await
        .unwrap();

        assert_eq!(
            events,
            vec![
                ServerSentEvent::message("a").with_id("2"),
                ServerSentEvent::message("b").with_id("3"),
            ]
        );
        assert_eq!(last_event_id, "3");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_blocking_wrong_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
            .mount(&server)
            .await;
        let url = server.uri();

        let result = tokio::task::spawn_blocking(move || {
            let source = connect(&Client::new(), url, ConnectConfig::default()).unwrap();
            assert_eq!(source.status(), StatusCode::OK);
            source.into_events().map(|_| ())
        })
        .await
        .unwrap();

        assert!(matches!(result, Err(SseError::ContentType { .. })));
    }
}
