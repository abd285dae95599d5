// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for testoutput-events

use thiserror::Error;

/// Errors that can occur while decoding a test event stream
#[derive(Debug, Error)]
pub enum EventsError {
    /// A single line could not be decoded as a test event
    ///
    /// The stream decoder never surfaces this; it drops the line instead.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Reading the input stream failed
    #[error("Failed reading test events: {0}")]
    Read(#[source] std::io::Error),

    /// Writing to the pass-through sink failed
    #[error("Failed writing pass-through output: {0}")]
    Passthrough(#[source] std::io::Error),
}
