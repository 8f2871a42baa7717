//! The dispatched event record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Event type used when a block never sets the `event` field.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// A single Server-Sent Event, produced once per dispatch.
///
/// Records are immutable values. `id` carries the decoder's last-event-id at
/// the moment of dispatch, so it persists across events until the stream
/// overwrites it with a later `id` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerSentEvent {
    event: String,
    data: String,
    id: String,
    retry: Option<u64>,
}

impl Default for ServerSentEvent {
    fn default() -> Self {
        Self {
            event: DEFAULT_EVENT_TYPE.to_string(),
            data: String::new(),
            id: String::new(),
            retry: None,
        }
    }
}

impl ServerSentEvent {
    /// Create an event with all fields set explicitly.
    ///
    /// An empty `event` falls back to `"message"`.
    pub fn new(
        event: impl Into<String>,
        data: impl Into<String>,
        id: impl Into<String>,
        retry: Option<u64>,
    ) -> Self {
        let mut event = event.into();
        if event.is_empty() {
            event = DEFAULT_EVENT_TYPE.to_string();
        }

        Self {
            event,
            data: data.into(),
            id: id.into(),
            retry,
        }
    }

    /// Create a `"message"` event carrying just `data`.
    pub fn message(data: impl Into<String>) -> Self {
        Self::default().with_data(data)
    }

    /// Set the event type.
    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        let event = event.into();
        self.event = if event.is_empty() {
            DEFAULT_EVENT_TYPE.to_string()
        } else {
            event
        };
        self
    }

    /// Set the payload.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the event ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the reconnection delay in milliseconds.
    pub fn with_retry(mut self, retry: u64) -> Self {
        self.retry = Some(retry);
        self
    }

    /// The event type, `"message"` unless the stream named one.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The payload, with multiple `data` lines joined by `\n`.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// The last event ID seen on the stream at dispatch time.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reconnection delay in milliseconds, if this event carried one.
    pub fn retry(&self) -> Option<u64> {
        self.retry
    }

    /// Reconnection delay as a [`Duration`].
    pub fn retry_duration(&self) -> Option<Duration> {
        self.retry.map(Duration::from_millis)
    }

    /// Whether this is a plain `"message"` event.
    pub fn is_message(&self) -> bool {
        self.event == DEFAULT_EVENT_TYPE
    }

    /// Decode the payload as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.data)
    }

    /// Consume the event, returning its payload.
    pub fn into_data(self) -> String {
        self.data
    }
}
