//! Stream adapter over the incremental parser.
//!
//! [`EventStream`] bridges a chunked text stream (an HTTP response body
//! after decoding, a test fixture, anything implementing
//! [`futures::Stream`]) to a stream of parsed [`Event`]s. It is a pure
//! adapter: each upstream chunk is fed to the parser, and every event the
//! parser dispatches is yielded downstream before the upstream is polled
//! again.

use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use pin_project::pin_project;

use crate::event::Event;
use crate::parser::{EventParser, EventSink};

/// Sink that queues events for the adapter to drain.
#[derive(Debug, Default)]
struct EventQueue {
    events: VecDeque<Event>,
    retry: Option<u64>,
}

impl EventSink for EventQueue {
    fn dispatch_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    fn set_reconnection_time(&mut self, retry_ms: u64) {
        self.retry = Some(retry_ms);
    }
}

/// Adapter turning a stream of text chunks into a stream of events.
///
/// Chunk boundaries are invisible: zero, one, or many events may be yielded
/// per upstream chunk, in the order their terminating blank lines appear.
/// Upstream errors are forwarded verbatim. When the upstream ends, any
/// buffered tail without a terminating blank line is dropped, not flushed.
///
/// # Examples
///
/// ```rust
/// use futures::{executor::block_on, stream, StreamExt};
/// use sse_wire::EventStream;
///
/// let chunks = ["event: add", "\ndata: 4", "2\n\n"]
///     .map(Ok::<_, std::convert::Infallible>);
/// let mut events = EventStream::new(stream::iter(chunks));
///
/// let event = block_on(events.next()).unwrap().unwrap();
/// assert_eq!(event.event_type, "add");
/// assert_eq!(event.data, "42");
/// ```
#[pin_project]
pub struct EventStream<S> {
    #[pin]
    inner: S,
    parser: EventParser<EventQueue>,
    done: bool,
}

impl<S> EventStream<S> {
    /// Wrap a chunk stream.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            parser: EventParser::new(EventQueue::default()),
            done: false,
        }
    }

    /// The most recently accepted event id, empty before the first one.
    pub fn last_event_id(&self) -> &str {
        self.parser.last_event_id()
    }

    /// The most recent reconnection interval requested by the stream, in
    /// milliseconds. `None` until a well-formed `retry:` field arrives.
    pub fn retry(&self) -> Option<u64> {
        self.parser.sink().retry
    }
}

impl<S, T, E> Stream for EventStream<S>
where
    S: Stream<Item = Result<T, E>>,
    T: AsRef<str>,
{
    type Item = Result<Event, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(event) = this.parser.sink_mut().events.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }
            if *this.done {
                return Poll::Ready(None);
            }
            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => this.parser.feed(chunk.as_ref()),
                Poll::Ready(Some(Err(err))) => return Poll::Ready(Some(Err(err))),
                // Upstream ended: the un-terminated tail, if any, is dropped.
                Poll::Ready(None) => *this.done = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<S> fmt::Debug for EventStream<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("parser", &self.parser)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{stream, StreamExt};
    use pretty_assertions::assert_eq;
    use std::convert::Infallible;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static str, Infallible>> {
        stream::iter(parts.to_vec()).map(Ok)
    }

    #[tokio::test]
    async fn yields_events_across_chunk_boundaries() {
        let stream = EventStream::new(chunks(&[
            "data: This is a message\n\n",
            "data: This is another\nda",
            "ta: message\n\ndata:Yet another\n",
            "data: message\n\n",
        ]));

        let events: Vec<_> = stream.map(Result::unwrap).collect().await;

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].data, "This is a message");
        assert_eq!(events[1].data, "This is another\nmessage");
        assert_eq!(events[2].data, "Yet another\nmessage");
    }

    #[tokio::test]
    async fn multiple_events_in_one_chunk() {
        let stream = EventStream::new(chunks(&["data: 1\n\ndata: 2\n\ndata: 3\n\n"]));

        let events: Vec<_> = stream.map(Result::unwrap).collect().await;
        let data: Vec<_> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn upstream_errors_forwarded_in_order() {
        let items: Vec<Result<&str, &str>> =
            vec![Ok("data: ok\n\n"), Err("boom"), Ok("data: after\n\n")];
        let results: Vec<_> = EventStream::new(stream::iter(items)).collect().await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().data, "ok");
        assert_eq!(results[1].as_ref().unwrap_err(), &"boom");
        assert_eq!(results[2].as_ref().unwrap().data, "after");
    }

    #[tokio::test]
    async fn unterminated_tail_dropped_at_end_of_stream() {
        let stream = EventStream::new(chunks(&["data: complete\n\ndata: dangling"]));

        let events: Vec<_> = stream.map(Result::unwrap).collect().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "complete");
    }

    #[tokio::test]
    async fn retry_and_last_event_id_observable() {
        let mut stream = EventStream::new(chunks(&["retry: 3000\nid: 41\ndata: x\n\n"]));
        assert_eq!(stream.retry(), None);
        assert_eq!(stream.last_event_id(), "");

        let event = stream.next().await.unwrap().unwrap();
        assert_eq!(event.last_event_id, "41");
        assert_eq!(stream.retry(), Some(3000));
        assert_eq!(stream.last_event_id(), "41");
    }

    #[tokio::test]
    async fn owned_string_chunks_accepted() {
        let items = vec![Ok::<String, Infallible>("data: owned\n\n".to_string())];
        let events: Vec<_> = EventStream::new(stream::iter(items))
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(events[0].data, "owned");
    }
}
