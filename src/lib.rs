//! # Incremental Server-Sent Events parsing
//!
//! A small, transport-agnostic parser for the SSE wire format with:
//! - Correctness under arbitrary chunking: byte-at-a-time, line-at-a-time,
//!   or whole-stream feeding all produce the same events
//! - `\r\n`, bare `\r`, and bare `\n` line terminators, including
//!   terminators split across chunks
//! - Sticky event ids and advisory `retry:` reconnection intervals
//! - A [`futures::Stream`] adapter for chunked transports
//!
//! The crate performs no I/O and no byte decoding: it consumes already
//! decoded text and reports what the stream said. Reconnection itself is
//! the transport's job.
//!
//! ## Quick Start
//!
//! ### Push parsing
//!
//! ```rust
//! use sse_wire::EventParser;
//!
//! let mut parser = EventParser::new(Vec::new());
//!
//! // Feed chunks exactly as the transport delivers them.
//! parser.feed("event: stock\ndata: YH");
//! parser.feed("OO\ndata: +2\n\n");
//!
//! let events = parser.into_sink();
//! assert_eq!(events[0].event_type, "stock");
//! assert_eq!(events[0].data, "YHOO\n+2");
//! ```
//!
//! ### Stream adapter
//!
//! ```rust
//! use futures::{executor::block_on, stream, StreamExt};
//! use sse_wire::EventStream;
//!
//! let body = ["id: 1\nda", "ta: hello\n", "\n"].map(Ok::<_, std::convert::Infallible>);
//! let mut events = EventStream::new(stream::iter(body));
//!
//! let event = block_on(events.next()).unwrap().unwrap();
//! assert_eq!(event.data, "hello");
//! assert_eq!(events.last_event_id(), "1");
//! ```
//!
//! ### Custom sinks
//!
//! Implement [`EventSink`] to receive events and reconnection intervals as
//! they are parsed:
//!
//! ```rust
//! use sse_wire::{Event, EventParser, EventSink};
//!
//! #[derive(Default)]
//! struct Printer {
//!     retry_ms: Option<u64>,
//! }
//!
//! impl EventSink for Printer {
//!     fn dispatch_event(&mut self, event: Event) {
//!         println!("{}: {}", event.event_type, event.data);
//!     }
//!
//!     fn set_reconnection_time(&mut self, retry_ms: u64) {
//!         self.retry_ms = Some(retry_ms);
//!     }
//! }
//!
//! let mut parser = EventParser::new(Printer::default());
//! parser.feed("retry: 3000\ndata: hi\n\n");
//! assert_eq!(parser.sink().retry_ms, Some(3000));
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod event;
pub mod parser;

#[cfg(feature = "stream")]
#[cfg_attr(docsrs, doc(cfg(feature = "stream")))]
pub mod stream;

pub use event::{Event, DEFAULT_EVENT_TYPE};
pub use parser::{EventParser, EventSink};

#[cfg(feature = "stream")]
pub use stream::EventStream;
