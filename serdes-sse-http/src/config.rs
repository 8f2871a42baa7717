//! Request configuration for event stream connections.

use crate::error::{SseError, SseResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL};
use reqwest::Method;

/// Name of the header that tells a server where to resume.
pub const LAST_EVENT_ID: &str = "last-event-id";

/// Configuration for opening an event stream.
///
/// `Accept: text/event-stream` and `Cache-Control: no-store` are always
/// sent. Extra headers are applied after them and may override them.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    /// HTTP method.
    pub method: Method,
    /// Extra request headers, in order.
    pub headers: Vec<(String, String)>,
    /// Event ID to resume from, sent as `Last-Event-ID` and used to seed the
    /// decoder.
    pub last_event_id: Option<String>,
    /// Optional request body.
    pub body: Option<String>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            last_event_id: None,
            body: None,
        }
    }
}

impl ConnectConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a request header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Resume from an event ID. An empty ID is not sent.
    pub fn last_event_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.last_event_id = if id.is_empty() { None } else { Some(id) };
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Build the full header map for the request.
    pub fn header_map(&self) -> SseResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        if let Some(id) = &self.last_event_id {
            headers.insert(
                HeaderName::from_static(LAST_EVENT_ID),
                header_value(LAST_EVENT_ID, id)?,
            );
        }

        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| SseError::InvalidHeader(format!("{}: {}", name, e)))?;
            headers.insert(header_name, header_value(name, value)?);
        }

        Ok(headers)
    }
}

fn header_value(name: &str, value: &str) -> SseResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| SseError::InvalidHeader(format!("{}: {}", name, e)))
}
