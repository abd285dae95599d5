// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Decoding of `go test -json` output
//!
//! The input is newline-delimited JSON, one [`TestEvent`] per line. Lines that
//! do not decode are dropped so that interleaved build output or truncated
//! writes never abort a run.
//!
//! # Example
//!
//! ```no_run
//! use testoutput_events::decode_events;
//!
//! let input = std::io::stdin().lock();
//! let mut stdout = std::io::stdout();
//! let log = decode_events(input, Some(&mut stdout)).unwrap();
//! println!("decoded {} events", log.len());
//! ```

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::EventsError;
use crate::event::{Action, TestEvent};
use crate::index::Events;

/// All events decoded from one input stream, in arrival order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<TestEvent>,
}

impl EventLog {
    /// Wrap already decoded events
    #[must_use]
    pub fn new(events: Vec<TestEvent>) -> Self {
        Self { events }
    }

    /// View over every event, ready for filtering and grouping
    #[must_use]
    pub fn events(&self) -> Events<'_> {
        self.events.iter().collect()
    }

    /// Number of decoded events
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event was decoded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate the events in arrival order
    pub fn iter(&self) -> std::slice::Iter<'_, TestEvent> {
        self.events.iter()
    }

    /// Take the decoded events
    #[must_use]
    pub fn into_inner(self) -> Vec<TestEvent> {
        self.events
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a TestEvent;
    type IntoIter = std::slice::Iter<'a, TestEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Decode a single line into a test event
///
/// A trailing `\r` or `\n` is ignored. Invalid UTF-8 is replaced with
/// U+FFFD before decoding, so a stray byte in captured output does not lose
/// the event.
///
/// # Errors
///
/// Returns `EventsError::JsonParse` if the line is not a valid event.
pub fn decode_line(line: &[u8]) -> Result<TestEvent, EventsError> {
    let text = String::from_utf8_lossy(trim_line_ending(line));
    serde_json::from_str(&text).map_err(EventsError::from)
}

fn trim_line_ending(mut line: &[u8]) -> &[u8] {
    if let Some(rest) = line.strip_suffix(b"\n") {
        line = rest;
    }
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Incremental decoder for `go test -json` lines
///
/// Feed it one line at a time with [`EventDecoder::process_line`] and collect
/// the result with [`EventDecoder::finish`].
pub struct EventDecoder<'w> {
    passthrough: Option<&'w mut dyn Write>,
    events: Vec<TestEvent>,
    skipped: usize,
}

impl<'w> EventDecoder<'w> {
    /// Create a decoder without a pass-through sink
    #[must_use]
    pub fn new() -> Self {
        Self {
            passthrough: None,
            events: Vec::new(),
            skipped: 0,
        }
    }

    /// Create a decoder that mirrors every `output` event's text to `sink`
    #[must_use]
    pub fn with_passthrough(sink: &'w mut dyn Write) -> Self {
        Self {
            passthrough: Some(sink),
            ..Self::new()
        }
    }

    /// Process a single line of input
    ///
    /// Returns the decoded event, or `None` if the line was dropped.
    ///
    /// # Errors
    ///
    /// Returns `EventsError::Passthrough` if writing to the pass-through sink
    /// fails. Undecodable lines are not errors.
    pub fn process_line(&mut self, line: &[u8]) -> Result<Option<&TestEvent>, EventsError> {
        let event = match decode_line(line) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "Skipping undecodable test event line");
                self.skipped += 1;
                return Ok(None);
            }
        };

        if event.action == Action::Output {
            if let Some(sink) = self.passthrough.as_mut() {
                sink.write_all(event.output.as_bytes())
                    .and_then(|()| sink.flush())
                    .map_err(EventsError::Passthrough)?;
            }
        }

        self.events.push(event);
        Ok(self.events.last())
    }

    /// Number of lines dropped so far
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Events decoded so far
    #[must_use]
    pub fn events(&self) -> &[TestEvent] {
        &self.events
    }

    /// Finalize and return the decoded log
    #[must_use]
    pub fn finish(self) -> EventLog {
        EventLog::new(self.events)
    }
}

impl Default for EventDecoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a whole `go test -json` stream
///
/// Reads until end of input. When `passthrough` is set, the text of every
/// `output` event is written to it before the event is recorded.
///
/// # Errors
///
/// Returns `EventsError::Read` if reading the input fails and
/// `EventsError::Passthrough` if writing to the pass-through sink fails.
pub fn decode_events<R: BufRead>(
    mut reader: R,
    passthrough: Option<&mut dyn Write>,
) -> Result<EventLog, EventsError> {
    let mut decoder = match passthrough {
        Some(sink) => EventDecoder::with_passthrough(sink),
        None => EventDecoder::new(),
    };

    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(EventsError::Read)?;
        if read == 0 {
            break;
        }
        decoder.process_line(&line)?;
    }

    debug!(
        events = decoder.events().len(),
        skipped = decoder.skipped(),
        "Finished decoding test events"
    );
    Ok(decoder.finish())
}
