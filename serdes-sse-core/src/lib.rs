//! # serdes-sse-core
//!
//! Incremental Server-Sent Events decoding.
//!
//! This crate turns an HTTP response body, delivered as byte chunks of any
//! size, into [`ServerSentEvent`] records without buffering the whole body.
//! It implements the WHATWG event stream interpretation rules and nothing
//! else: no HTTP, no reconnection.
//!
//! ## Core Concepts
//!
//! - **[`LineSplitter`]**: Bytes to lines, across chunk boundaries
//! - **[`FieldToken`]**: One line classified as blank, comment or field
//! - **[`EventAccumulator`]**: Folds fields into events, dispatching on blank lines
//! - **[`SseDecoder`]**: All three composed, with no I/O
//! - **[`SseStream`]** / **[`SseIter`]**: The decoder driven by an async
//!   byte stream or a blocking chunk iterator
//!
//! ## Example - Async
//!
//! ```ignore
//! use serdes_sse_core::SseStreamExt;
//! use futures::StreamExt;
//!
//! let mut events = response.bytes_stream().sse_events();
//! while let Some(event) = events.next().await {
//!     let event = event?;
//!     println!("{}: {}", event.event(), event.data());
//! }
//! ```
//!
//! ## Example - Blocking
//!
//! ```
//! use serdes_sse_core::SseIter;
//!
//! let body: &[u8] = b"event: greeting\ndata: hello\n\n";
//! let events: Vec<_> = SseIter::from_reader(body)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(events[0].event(), "greeting");
//! assert_eq!(events[0].data(), "hello");
//! ```
//!
//! ## Example - Reconnecting
//!
//! The decoder never reconnects. It exposes what a caller's loop needs:
//!
//! ```ignore
//! let mut last_event_id = String::new();
//! loop {
//!     let body = open_stream(&last_event_id).await?;
//!     let mut events = SseStream::with_last_event_id(body, last_event_id.clone());
//!     while let Some(Ok(event)) = events.next().await {
//!         handle(&event);
//!     }
//!     last_event_id = events.last_event_id().to_string();
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod blocking;
pub mod decoder;
pub mod event;
pub mod field;
pub mod lines;
pub mod stream;

// Re-exports
pub use blocking::{ReaderChunks, SseIter, SseIterExt};
pub use decoder::{EventAccumulator, SseDecoder};
pub use event::{ServerSentEvent, DEFAULT_EVENT_TYPE};
pub use field::{FieldName, FieldToken};
pub use lines::{LineSplitter, Lines};
pub use stream::{SseStream, SseStreamExt};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{ServerSentEvent, SseDecoder, SseIter, SseIterExt, SseStream, SseStreamExt};
}
