//! The parsed event value type.

use std::fmt;

/// Event type used when a block never carries an `event:` field.
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// A single parsed Server-Sent Event.
///
/// Events are transient values: the parser constructs one per committed
/// block and hands it to the sink without retaining a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    /// Event type from the `event:` field, [`DEFAULT_EVENT_TYPE`] when unset.
    pub event_type: String,
    /// Payload from the `data:` field(s), joined with newlines.
    pub data: String,
    /// The sticky event id in effect when this event was committed.
    /// Empty when no `id:` field has been accepted yet on the stream.
    pub last_event_id: String,
}

impl Event {
    /// Create an event of the default type with the given data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sse_wire::{Event, DEFAULT_EVENT_TYPE};
    ///
    /// let event = Event::new("Hello, world!");
    /// assert_eq!(event.event_type, DEFAULT_EVENT_TYPE);
    /// assert_eq!(event.data, "Hello, world!");
    /// assert_eq!(event.last_event_id, "");
    /// ```
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            data: data.into(),
            last_event_id: String::new(),
        }
    }

    /// Set the event type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sse_wire::Event;
    ///
    /// let event = Event::new("pong").with_event_type("ping");
    /// assert_eq!(event.event_type, "ping");
    /// ```
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Set the event id.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sse_wire::Event;
    ///
    /// let event = Event::new("data").with_last_event_id("msg-123");
    /// assert_eq!(event.last_event_id, "msg-123");
    /// ```
    pub fn with_last_event_id(mut self, id: impl Into<String>) -> Self {
        self.last_event_id = id.into();
        self
    }
}

impl fmt::Display for Event {
    /// Renders the event in wire form, terminated by a blank line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.event_type != DEFAULT_EVENT_TYPE {
            writeln!(f, "event: {}", self.event_type)?;
        }
        if !self.last_event_id.is_empty() {
            writeln!(f, "id: {}", self.last_event_id)?;
        }
        for line in self.data.split('\n') {
            writeln!(f, "data: {}", line)?;
        }
        writeln!(f)
    }
}
