//! The event accumulation state machine and the pure decoder built on it.
//!
//! Nothing here performs I/O or knows about scheduling: bytes go in, events
//! come out. Both stream facades drive an [`SseDecoder`].

use crate::event::ServerSentEvent;
use crate::field::{FieldName, FieldToken};
use crate::lines::LineSplitter;
use tracing::{debug, trace};

/// Folds field tokens into events, dispatching on blank lines.
///
/// A blank line dispatches only when at least one field was accepted since
/// the previous dispatch: a non-empty `event`, `data`, an `id` without NUL,
/// or a valid `retry`. An empty `event` resets the type to `message` but
/// does not by itself make the block dispatchable. Comments, unknown fields,
/// rejected values and repeated blank lines never produce an event.
#[derive(Debug, Clone, Default)]
pub struct EventAccumulator {
    event: String,
    data: String,
    data_lines: usize,
    retry: Option<u64>,
    last_event_id: String,
    pending: bool,
}

impl EventAccumulator {
    /// Create an accumulator with an empty last event ID.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator seeded with a last event ID, typically the one
    /// recorded before a reconnect. A seed containing NUL is ignored.
    #[must_use]
    pub fn with_last_event_id(id: impl Into<String>) -> Self {
        let mut accumulator = Self::new();
        let id = id.into();
        if is_valid_id(&id) {
            accumulator.last_event_id = id;
        }
        accumulator
    }

    /// The last event ID seen so far. Updated as soon as an `id` field is
    /// processed, before the event carrying it is dispatched.
    pub fn last_event_id(&self) -> &str {
        &self.last_event_id
    }

    /// Whether fields have been accepted since the last dispatch.
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Apply one token, returning the event it dispatches, if any.
    pub fn process(&mut self, token: FieldToken<'_>) -> Option<ServerSentEvent> {
        match token {
            FieldToken::Blank => self.dispatch(),
            FieldToken::Comment(_) => None,
            FieldToken::Field { name, value } => {
                self.apply_field(FieldName::classify(name), value);
                None
            }
        }
    }

    /// Drop the event in progress without dispatching it.
    ///
    /// The last event ID survives.
    pub fn discard_pending(&mut self) {
        self.event.clear();
        self.data.clear();
        self.data_lines = 0;
        self.retry = None;
        self.pending = false;
    }

    fn apply_field(&mut self, name: FieldName, value: &str) {
        match name {
            FieldName::Event => {
                self.event.clear();
                self.event.push_str(value);
                if value.is_empty() {
                    return;
                }
            }
            FieldName::Data => {
                if self.data_lines > 0 {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.data_lines += 1;
            }
            FieldName::Id => {
                if !is_valid_id(value) {
                    debug!("Ignoring event id containing NUL");
                    return;
                }
                self.last_event_id.clear();
                self.last_event_id.push_str(value);
            }
            FieldName::Retry => match parse_retry(value) {
                Some(retry) => self.retry = Some(retry),
                None => {
                    debug!(value = %value, "Ignoring invalid retry value");
                    return;
                }
            },
            FieldName::Unknown => return,
        }

        self.pending = true;
    }

    fn dispatch(&mut self) -> Option<ServerSentEvent> {
        if !self.pending {
            return None;
        }

        let event = ServerSentEvent::new(
            std::mem::take(&mut self.event),
            std::mem::take(&mut self.data),
            self.last_event_id.clone(),
            self.retry.take(),
        );
        self.discard_pending();

        trace!(
            event = %event.event(),
            data_len = event.data().len(),
            id = %event.id(),
            "Dispatching event"
        );

        Some(event)
    }
}

fn is_valid_id(value: &str) -> bool {
    !value.contains('\0')
}

/// Parse a `retry` value: one or more ASCII digits that fit in a `u64`.
fn parse_retry(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Incremental SSE decoder: line splitting, field parsing and dispatch.
///
/// Feed it chunks as they arrive, in order; chunk boundaries never affect
/// the decoded events. One decoder serves one stream.
#[derive(Debug, Default)]
pub struct SseDecoder {
    lines: LineSplitter,
    accumulator: EventAccumulator,
}

impl SseDecoder {
    /// Create a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder resuming from a previously seen event ID.
    #[must_use]
    pub fn with_last_event_id(id: impl Into<String>) -> Self {
        Self {
            lines: LineSplitter::new(),
            accumulator: EventAccumulator::with_last_event_id(id),
        }
    }

    /// Feed a chunk of bytes, returning the events it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<ServerSentEvent> {
        let mut events = Vec::new();
        self.feed_into(chunk, &mut events);
        events
    }

    /// Feed a chunk of text.
    pub fn feed_str(&mut self, chunk: &str) -> Vec<ServerSentEvent> {
        self.feed(chunk.as_bytes())
    }

    /// Feed a chunk, appending completed events to `out`.
    pub fn feed_into<E>(&mut self, chunk: &[u8], out: &mut E)
    where
        E: Extend<ServerSentEvent>,
    {
        let accumulator = &mut self.accumulator;
        out.extend(
            self.lines
                .feed(chunk)
                .filter_map(|line| accumulator.process(FieldToken::parse(&line))),
        );
    }

    /// Signal end of stream.
    ///
    /// A trailing unterminated line is still processed, so it can update the
    /// last event ID, but the event in progress is discarded: an event is
    /// only dispatched by a blank line.
    pub fn finish(&mut self) {
        if let Some(line) = self.lines.finish() {
            // A flushed line is never blank, so this cannot dispatch.
            let _ = self.accumulator.process(FieldToken::parse(&line));
        }

        if self.accumulator.has_pending() {
            debug!("Stream ended mid-event, discarding undispatched fields");
        }
        self.accumulator.discard_pending();
    }

    /// The last event ID seen on the stream, for resuming after a reconnect.
    pub fn last_event_id(&self) -> &str {
        self.accumulator.last_event_id()
    }

    /// Whether fields have been accepted that no blank line has dispatched yet.
    pub fn has_pending(&self) -> bool {
        self.accumulator.has_pending()
    }
}
