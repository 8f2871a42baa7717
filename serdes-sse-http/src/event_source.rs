//! Async event stream connections.

use crate::config::ConnectConfig;
use crate::content_type::check_content_type;
use crate::error::{SseError, SseResult};
use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use reqwest::header::HeaderMap;
use reqwest::{Client, IntoUrl, Response, StatusCode};
use serdes_sse_core::SseStream;
use std::pin::Pin;
use tracing::debug;

/// Response body as a boxed byte stream.
pub type ByteStream = Pin<Box<dyn Stream<Item = SseResult<Bytes>> + Send>>;

/// Stream of decoded events from a response body.
pub type EventStream = SseStream<ByteStream>;

/// An HTTP response that is expected to carry an event stream.
///
/// Status and headers can be inspected before any body is read. The
/// content type is checked when the events are requested.
#[derive(Debug)]
pub struct EventSource {
    response: Response,
    last_event_id: Option<String>,
}

impl EventSource {
    /// Wrap a response.
    pub fn new(response: Response) -> Self {
        Self {
            response,
            last_event_id: None,
        }
    }

    /// Seed the decoder with an event ID to resume from.
    pub fn with_last_event_id(mut self, id: impl Into<String>) -> Self {
        self.last_event_id = Some(id.into());
        self
    }

    /// The underlying response.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// Fail unless the response is `text/event-stream`.
    pub fn check_content_type(&self) -> SseResult<()> {
        check_content_type(self.response.headers())
    }

    /// Give back the response without reading it.
    pub fn into_response(self) -> Response {
        self.response
    }

    /// Validate the content type and start decoding the body.
    ///
    /// Dropping the returned stream closes the connection.
    pub fn into_stream(self) -> SseResult<EventStream> {
        self.check_content_type()?;

        let body: ByteStream = Box::pin(self.response.bytes_stream().map_err(SseError::from));
        Ok(match self.last_event_id {
            Some(id) => SseStream::with_last_event_id(body, id),
            None => SseStream::new(body),
        })
    }
}

/// Open an event stream.
///
/// Sends the request described by `config` and returns the response
/// wrapped in an [`EventSource`]. The status is not checked; the content
/// type is checked by [`EventSource::into_stream`].
pub async fn connect(
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

    let response = client.execute(request).await?;
    debug!(status = %response.status(), "Event stream response received");

    let source = EventSource::new(response);
    Ok(match config.last_event_id {
        Some(id) => source.with_last_event_id(id),
        None => source,
    })
}
