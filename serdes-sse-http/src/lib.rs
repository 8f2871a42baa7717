//! # serdes-sse-http
//!
//! HTTP connector for Server-Sent Events, built on `reqwest`.
//!
//! This crate opens the request, checks that the server answered with
//! `text/event-stream`, and hands the body to the decoder in
//! [`serdes_sse_core`]. It does not reconnect: every event carries its
//! `id` and `retry`, and [`ConnectConfig::last_event_id`] resumes a stream,
//! which is all a caller's reconnect loop needs.
//!
//! ## Core Concepts
//!
//! - **[`connect`]**: Send the request, return an [`EventSource`]
//! - **[`EventSource`]**: Status and headers, then events via [`EventSource::into_stream`]
//! - **[`ConnectConfig`]**: Method, headers, body and resume point
//! - **[`SseError`]**: Content-type mismatch, transport and decoding failures
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use serdes_sse_http::{connect, ConnectConfig};
//!
//! let client = reqwest::Client::new();
//! let source = connect(&client, "https://example.com/events", ConnectConfig::new()).await?;
//! let mut events = source.into_stream()?;
//!
//! while let Some(event) = events.next().await {
//!     let event = event?;
//!     println!("{}: {}", event.event(), event.data());
//! }
//! ```
//!
//! ## Blocking
//!
//! With the `blocking` feature:
//!
//! ```ignore
//! use serdes_sse_http::{blocking, ConnectConfig};
//!
//! let client = reqwest::blocking::Client::new();
//! for event in blocking::connect(&client, url, ConnectConfig::new())?.into_events()? {
//!     println!("{}", event?.data());
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

#[cfg(feature = "blocking")]
#[cfg_attr(docsrs, doc(cfg(feature = "blocking")))]
pub mod blocking;
pub mod config;
pub mod content_type;
pub mod error;
pub mod event_source;

// Re-exports
pub use config::{ConnectConfig, LAST_EVENT_ID};
pub use content_type::{check_content_type, is_event_stream};
pub use error::{SseError, SseResult};
pub use event_source::{connect, ByteStream, EventSource, EventStream};
