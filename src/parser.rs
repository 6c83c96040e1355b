//! Incremental parser for the Server-Sent Events wire format.
//!
//! The parser owns a text buffer and per-event accumulation state, so it
//! reconstructs events correctly no matter how the transport fragments the
//! input: one byte per call, one line per call, or the whole stream at once.
//! Completed events are pushed into an [`EventSink`] as soon as their
//! terminating blank line is seen.

use std::fmt;

use crate::event::{Event, DEFAULT_EVENT_TYPE};

/// Receiver for parser output.
///
/// `dispatch_event` is called once per completed event, in stream order.
/// `set_reconnection_time` is called for every well-formed `retry:` field;
/// the default implementation drops the directive, matching consumers that
/// have no reconnection logic to inform.
pub trait EventSink {
    /// Receive one completed event.
    fn dispatch_event(&mut self, event: Event);

    /// Receive an advisory reconnection interval in milliseconds.
    fn set_reconnection_time(&mut self, retry_ms: u64) {
        let _ = retry_ms;
    }
}

/// Collects dispatched events, dropping reconnection directives.
impl EventSink for Vec<Event> {
    fn dispatch_event(&mut self, event: Event) {
        self.push(event);
    }
}

/// Streaming SSE parser.
///
/// One parser instance handles one logical stream. Feeding is synchronous:
/// every event completed by a chunk is dispatched to the sink before
/// [`feed`](EventParser::feed) returns.
///
/// # Examples
///
/// ```rust
/// use sse_wire::EventParser;
///
/// let mut parser = EventParser::new(Vec::new());
///
/// // Chunk boundaries need not align with lines or events.
/// parser.feed("event: add\ndata: 73857");
/// assert!(parser.sink().is_empty());
///
/// parser.feed("293\n\n");
/// assert_eq!(parser.sink()[0].event_type, "add");
/// assert_eq!(parser.sink()[0].data, "73857293");
/// ```
pub struct EventParser<S> {
    sink: S,
    /// Unconsumed tail of the input; grows until a terminator arrives.
    buffer: String,
    /// `data` accumulator for the current block, newline-terminated per field.
    data: String,
    /// `event` accumulator for the current block.
    event_type: String,
    /// Sticky id, replaced only by an accepted `id:` field.
    last_event_id: String,
    first_chunk: bool,
}

impl<S: EventSink> EventParser<S> {
    /// Create a parser dispatching into `sink`.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            buffer: String::new(),
            data: String::new(),
            event_type: String::new(),
            last_event_id: String::new(),
            first_chunk: true,
        }
    }

    /// Feed one chunk of decoded text.
    ///
    /// Dispatches zero or more events and zero or more reconnection
    /// directives to the sink. Malformed lines are normalized or ignored;
    /// this method never fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sse_wire::EventParser;
    ///
    /// let mut parser = EventParser::new(Vec::new());
    /// parser.feed("data: one\ndata: two\n\n");
    /// assert_eq!(parser.sink()[0].data, "one\ntwo");
    /// ```
    pub fn feed(&mut self, chunk: &str) {
        self.buffer.push_str(chunk);

        // The BOM is only ever stripped at position 0 of the first chunk.
        if self.first_chunk {
            self.first_chunk = false;
            if self.buffer.starts_with('\u{feff}') {
                self.buffer.drain(..'\u{feff}'.len_utf8());
            }
        }

        let mut consumed = 0;
        while let Some((len, term_len)) = next_line(&self.buffer[consumed..]) {
            let line = self.buffer[consumed..consumed + len].to_string();
            consumed += len + term_len;
            self.process_line(&line);
        }
        if consumed > 0 {
            self.buffer.drain(..consumed);
        }
    }

    /// The most recently accepted event id, empty before the first one.
    ///
    /// This is the value a transport would send as `Last-Event-ID` when
    /// reconnecting.
    pub fn last_event_id(&self) -> &str {
        &self.last_event_id
    }

    /// Discard the buffer and the partially accumulated event.
    ///
    /// The sticky id survives so a reconnecting transport can resume, and
    /// the BOM check is re-armed for the fresh stream.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.data.clear();
        self.event_type.clear();
        self.first_chunk = true;
    }

    /// Shared access to the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Exclusive access to the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the parser, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn process_line(&mut self, line: &str) {
        if line.is_empty() {
            self.commit();
        } else if line.starts_with(':') {
            // Comment line, used by servers as keepalive. No state change.
        } else if let Some(colon) = line.find(':') {
            let value = &line[colon + 1..];
            // At most one leading space is protocol framing; everything
            // else in the value is payload.
            let value = value.strip_prefix(' ').unwrap_or(value);
            self.process_field(&line[..colon], value);
        } else {
            self.process_field(line, "");
        }
    }

    fn process_field(&mut self, field: &str, value: &str) {
        match field {
            "event" => {
                self.event_type.clear();
                self.event_type.push_str(value);
            },
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            },
            "id" => {
                if value.contains('\0') {
                    tracing::debug!("ignoring id field containing NUL");
                } else {
                    self.last_event_id.clear();
                    self.last_event_id.push_str(value);
                }
            },
            "retry" => match parse_retry(value) {
                Some(retry_ms) => self.sink.set_reconnection_time(retry_ms),
                None => tracing::debug!(value, "ignoring malformed retry field"),
            },
            _ => {
                // Unknown field, ignore.
            },
        }
    }

    /// Commit the current block: dispatch it if it accumulated data,
    /// discard it otherwise. Either way the pending type is cleared.
    fn commit(&mut self) {
        let event_type = std::mem::take(&mut self.event_type);
        if self.data.is_empty() {
            return;
        }

        if self.data.ends_with('\n') {
            self.data.pop();
        }
        let event = Event {
            event_type: if event_type.is_empty() {
                DEFAULT_EVENT_TYPE.to_string()
            } else {
                event_type
            },
            data: std::mem::take(&mut self.data),
            last_event_id: self.last_event_id.clone(),
        };
        tracing::trace!(event_type = %event.event_type, bytes = event.data.len(), "dispatching event");
        self.sink.dispatch_event(event);
    }
}

impl<S: EventSink + Default> Default for EventParser<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> fmt::Debug for EventParser<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventParser")
            .field("buffered", &self.buffer.len())
            .field("last_event_id", &self.last_event_id)
            .finish_non_exhaustive()
    }
}

/// Locate the next complete line in `text`.
///
/// Returns the line length and terminator length. `\r\n`, bare `\r`, and
/// bare `\n` each terminate a line, but a `\r` that is the final buffered
/// character is not yet decidable: the next chunk may turn it into `\r\n`.
/// Holding it is what keeps extraction identical under every chunking.
fn next_line(text: &str) -> Option<(usize, usize)> {
    let pos = text.find(['\r', '\n'])?;
    if text.as_bytes()[pos] == b'\n' {
        return Some((pos, 1));
    }
    match text.as_bytes().get(pos + 1) {
        Some(b'\n') => Some((pos, 2)),
        Some(_) => Some((pos, 1)),
        None => None,
    }
}

/// Parse a `retry:` value: one or more ASCII digits, nothing else.
///
/// Signs, whitespace, decimal points, and digit strings wider than `u64`
/// all disqualify the value.
fn parse_retry(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
