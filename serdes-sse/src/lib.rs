//! # serdes-sse - Server-Sent Events for Rust
//!
//! Decode `text/event-stream` response bodies into typed events as the
//! bytes arrive, from async or blocking code.
//!
//! ## Quick Start
//!
//! ```ignore
//! use serdes_sse::prelude::*;
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), SseError> {
//!     let client = reqwest::Client::new();
//!     let mut events = connect(&client, "https://example.com/events", ConnectConfig::new())
//!         .await?
//!         .into_stream()?;
//!
//!     while let Some(event) = events.next().await {
//!         let event = event?;
//!         println!("{} {}", event.event(), event.data());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `http` | `reqwest` connector | ✅ |
//! | `blocking` | Blocking `reqwest` connector | ❌ |
//!
//! ## Architecture
//!
//! - [`serdes_sse_core`] - Decoder, event type, stream and iterator adapters
//! - [`serdes_sse_http`] - HTTP connector (optional)
//!
//! The decoder works on any byte source, with or without the connector:
//!
//! ```
//! use serdes_sse::SseDecoder;
//!
//! let mut decoder = SseDecoder::new();
//! assert!(decoder.feed(b"data: hel").is_empty());
//!
//! let events = decoder.feed(b"lo\n\n");
//! assert_eq!(events[0].data(), "hello");
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use serdes_sse_core;
pub use serdes_sse_core::{
    EventAccumulator, FieldName, FieldToken, LineSplitter, Lines, ReaderChunks, ServerSentEvent,
    SseDecoder, SseIter, SseIterExt, SseStream, SseStreamExt, DEFAULT_EVENT_TYPE,
};

#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub use serdes_sse_http;

#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub use serdes_sse_http::{
    check_content_type, connect, is_event_stream, ConnectConfig, EventSource, EventStream,
    SseError, SseResult,
};

#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub use serdes_sse_http::blocking;

/// Prelude for common imports.
pub mod prelude {
    pub use serdes_sse_core::prelude::*;

    #[cfg(feature = "http")]
    pub use serdes_sse_http::{connect, ConnectConfig, EventSource, SseError, SseResult};
}
