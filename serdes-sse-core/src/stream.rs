//! Non-blocking event stream over an async byte stream.

use crate::decoder::SseDecoder;
use crate::event::ServerSentEvent;
use futures::stream::FusedStream;
use futures::Stream;
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tracing::{debug, trace};

pin_project! {
    /// Stream adapter that decodes Server-Sent Events from a byte stream.
    ///
    /// The only suspension point is the poll of the inner stream; decoding a
    /// chunk and draining its events happens synchronously. Every event a
    /// chunk completes is yielded before the next chunk is requested.
    ///
    /// Errors from the inner stream are yielded unchanged, after which the
    /// stream ends. Dropping the adapter drops the inner stream, which is
    /// how an HTTP body releases its connection when the consumer stops
    /// early. One task drives one `SseStream`; it is not meant to be shared.
    #[must_use = "streams do nothing unless polled"]
    pub struct SseStream<S> {
        #[pin]
        inner: S,
        decoder: SseDecoder,
        pending: VecDeque<ServerSentEvent>,
        finished: bool,
    }
}

impl<S> SseStream<S> {
    /// Create a new SSE stream from a byte stream.
    pub fn new(inner: S) -> Self {
        Self::with_decoder(inner, SseDecoder::new())
    }

    /// Create a stream that resumes from a previously seen event ID.
    pub fn with_last_event_id(inner: S, id: impl Into<String>) -> Self {
        Self::with_decoder(inner, SseDecoder::with_last_event_id(id))
    }

    fn with_decoder(inner: S, decoder: SseDecoder) -> Self {
        Self {
            inner,
            decoder,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    /// The last event ID seen so far.
    pub fn last_event_id(&self) -> &str {
        self.decoder.last_event_id()
    }

    /// Get a reference to the underlying byte stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Consume the adapter, returning the underlying byte stream.
    ///
    /// Buffered partial input and undelivered events are dropped.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, B, E> Stream for SseStream<S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    type Item = Result<ServerSentEvent, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(event) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            if *this.finished {
                return Poll::Ready(None);
            }

            match ready!(this.inner.as_mut().poll_next(cx)) {
                Some(Ok(chunk)) => {
                    let chunk = chunk.as_ref();
                    trace!(len = chunk.len(), "Decoding chunk");
                    this.decoder.feed_into(chunk, this.pending);
                }
                Some(Err(error)) => {
                    debug!("Byte stream failed, ending event stream");
                    *this.finished = true;
                    return Poll::Ready(Some(Err(error)));
                }
                None => {
                    *this.finished = true;
                    this.decoder.finish();
                }
            }
        }
    }
}

impl<S, B, E> FusedStream for SseStream<S>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    fn is_terminated(&self) -> bool {
        self.finished && self.pending.is_empty()
    }
}

/// Extension trait for decoding Server-Sent Events from byte streams.
pub trait SseStreamExt: Stream + Sized {
    /// Decode this byte stream into events.
    fn sse_events(self) -> SseStream<Self> {
        SseStream::new(self)
    }
}

impl<S, B, E> SseStreamExt for S
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
}
