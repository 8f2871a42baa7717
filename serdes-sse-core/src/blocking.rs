//! Blocking event iterator over a synchronous chunk source.
//!
//! Decoding is identical to [`SseStream`](crate::SseStream); only the way the
//! next chunk is awaited differs.

use crate::decoder::SseDecoder;
use crate::event::ServerSentEvent;
use bytes::Bytes;
use std::collections::VecDeque;
use std::io::{self, Read};
use std::iter::FusedIterator;
use tracing::{debug, trace};

const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Iterator adapter that decodes Server-Sent Events from chunk results.
///
/// Each call to [`next`](Iterator::next) blocks on the inner iterator only
/// when no decoded event is waiting. Errors from the inner iterator are
/// returned unchanged and end the iteration. Dropping the adapter drops the
/// source, releasing whatever connection it holds.
#[derive(Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct SseIter<I> {
    inner: I,
    decoder: SseDecoder,
    pending: VecDeque<ServerSentEvent>,
    finished: bool,
}

impl<I> SseIter<I> {
    /// Create a new event iterator over a chunk iterator.
    pub fn new(inner: I) -> Self {
        Self::with_decoder(inner, SseDecoder::new())
    }

    /// Create an iterator that resumes from a previously seen event ID.
    pub fn with_last_event_id(inner: I, id: impl Into<String>) -> Self {
        Self::with_decoder(inner, SseDecoder::with_last_event_id(id))
    }

    fn with_decoder(inner: I, decoder: SseDecoder) -> Self {
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

    /// Get a reference to the chunk source.
    pub fn get_ref(&self) -> &I {
        &self.inner
    }

    /// Consume the adapter, returning the chunk source.
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<R: Read> SseIter<ReaderChunks<R>> {
    /// Decode events from anything readable, such as a blocking HTTP body.
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderChunks::new(reader))
    }
}

impl<I, B, E> Iterator for SseIter<I>
where
    I: Iterator<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    type Item = Result<ServerSentEvent, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }

            if self.finished {
                return None;
            }

            match self.inner.next() {
                Some(Ok(chunk)) => {
                    let chunk = chunk.as_ref();
                    trace!(len = chunk.len(), "Decoding chunk");
                    self.decoder.feed_into(chunk, &mut self.pending);
                }
                Some(Err(error)) => {
                    debug!("Chunk source failed, ending event iteration");
                    self.finished = true;
                    return Some(Err(error));
                }
                None => {
                    self.finished = true;
                    self.decoder.finish();
                }
            }
        }
    }
}

impl<I, B, E> FusedIterator for SseIter<I>
where
    I: Iterator<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
}

/// Extension trait for decoding Server-Sent Events from chunk iterators.
pub trait SseIterExt: Iterator + Sized {
    /// Decode the chunks yielded by this iterator into events.
    fn sse_events(self) -> SseIter<Self> {
        SseIter::new(self)
    }
}

impl<I, B, E> SseIterExt for I
where
    I: Iterator<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
}

/// Blocking chunk source reading from a [`Read`] implementation.
///
/// Yields whatever each `read` call returns, so chunk sizes follow the
/// reader. Interrupted reads are retried; any other error is yielded once
/// and ends the iteration.
#[derive(Debug)]
pub struct ReaderChunks<R> {
    reader: R,
    buf: Box<[u8]>,
    done: bool,
}

impl<R: Read> ReaderChunks<R> {
    /// Read with the default chunk size of 8 KiB.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_CHUNK_SIZE)
    }

    /// Read at most `capacity` bytes per chunk. A zero capacity is raised to one.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader,
            buf: vec![0; capacity.max(1)].into_boxed_slice(),
            done: false,
        }
    }

    /// Consume the source, returning the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for ReaderChunks<R> {
    type Item = io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(n) => return Some(Ok(Bytes::copy_from_slice(&self.buf[..n]))),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: Read> FusedIterator for ReaderChunks<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SseStream;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const SAMPLE: &str = "retry: 1000\nevent: open\ndata: {\"ok\": true}\n\n\
                          : keep-alive\r\n\
                          id: 7\r\ndata: first\r\ndata: second\r\n\r\n\
                          data: no id change\n\n\
                          id: \0\ndata: still 7\n\n\
                          data: never dispatched";

    fn expected() -> Vec<ServerSentEvent> {
        vec![
            ServerSentEvent::new("open", "{\"ok\": true}", "", Some(1000)),
            ServerSentEvent::new("message", "first\nsecond", "7", None),
            ServerSentEvent::new("message", "no id change", "7", None),
            ServerSentEvent::new("message", "still 7", "7", None),
        ]
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    #[case(64)]
    #[case(8 * 1024)]
    fn test_reader_chunk_sizes(#[case] capacity: usize) {
        let source = ReaderChunks::with_capacity(Cursor::new(SAMPLE), capacity);
        let events: Vec<_> = SseIter::new(source).map(Result::unwrap).collect();
        assert_eq!(events, expected());
    }

    #[test]
    fn test_from_reader() {
        let mut events = SseIter::from_reader(SAMPLE.as_bytes());
        let first = events.next().unwrap().unwrap();
        assert_eq!(first.retry(), Some(1000));
        assert_eq!(events.by_ref().count(), 3);
        assert_eq!(events.last_event_id(), "7");
        assert!(events.next().is_none());
    }

    #[tokio::test]
    async fn test_blocking_and_async_agree() {
        for size in [1, 5, 13, SAMPLE.len()] {
            let parts: Vec<Result<Vec<u8>, io::Error>> = SAMPLE
                .as_bytes()
                .chunks(size)
                .map(|chunk| Ok(chunk.to_vec()))
                .collect();

            let blocking: Vec<_> =
                SseIter::new(parts.iter().map(|part| part.as_ref().map_err(|_| ())))
                    .map(Result::unwrap)
                    .collect();

            let non_blocking: Vec<_> = SseStream::new(futures::stream::iter(parts))
                .map(Result::unwrap)
                .collect()
                .await;

            assert_eq!(blocking, expected(), "chunk size {size}");
            assert_eq!(non_blocking, blocking, "chunk size {size}");
        }
    }

    #[test]
    fn test_error_passes_through_and_ends() {
        let chunks: Vec<Result<&[u8], &str>> = vec![
            Ok(&b"data: a\n\n"[..]),
            Err("connection reset"),
            Ok(&b"data: b\n\n"[..]),
        ];
        let mut events = chunks.into_iter().sse_events();

        assert_eq!(events.next(), Some(Ok(ServerSentEvent::message("a"))));
        assert_eq!(events.next(), Some(Err("connection reset")));
        assert_eq!(events.next(), None);
    }

    struct FlakyReader {
        calls: usize,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            match self.calls {
                1 => Err(io::Error::new(io::ErrorKind::Interrupted, "signal")),
                2 => {
                    let data = b"data: x\n\n";
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                _ => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "gone")),
            }
        }
    }

    #[test]
    fn test_reader_errors() {
        let mut events = SseIter::from_reader(FlakyReader { calls: 0 });

        assert_eq!(events.next().unwrap().unwrap(), ServerSentEvent::message("x"));
        let error = events.next().unwrap().unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof);
        assert!(events.next().is_none());
        assert_eq!(events.into_inner().into_inner().calls, 3);
    }

    struct DropFlag<I> {
        inner: I,
        released: Arc<AtomicBool>,
    }

    impl<I: Iterator> Iterator for DropFlag<I> {
        type Item = I::Item;

        fn next(&mut self) -> Option<I::Item> {
            self.inner.next()
        }
    }

    impl<I> Drop for DropFlag<I> {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_drop_releases_unfinished_source() {
        let released = Arc::new(AtomicBool::new(false));
        let chunks: Vec<Result<&[u8], ()>> =
            vec![Ok(&b"data: a\n\ndata: b"[..]), Ok(&b"\n\n"[..])];
        let source = DropFlag {
            inner: chunks.into_iter(),
            released: Arc::clone(&released),
        };
        let mut events = SseIter::new(source);

        assert_eq!(events.next(), Some(Ok(ServerSentEvent::message("a"))));
        assert_eq!(events.get_ref().inner.len(), 1);
        assert!(!released.load(Ordering::SeqCst));

        drop(events);
        assert!(released.load(Ordering::SeqCst));
    }
}
