// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testoutput-events: Go test event processing for testoutput
//!
//! This library crate decodes the line-delimited JSON stream written by
//! `go test -json` and offers grouped views over the decoded events, so that
//! the outcome and captured output of every test can be resolved.
//!
//! # Example
//!
//! ```no_run
//! use testoutput_events::{Outcome, decode_events};
//!
//! let input = r#"{"Action":"fail","Package":"example.com/m/pkg","Test":"TestFoo"}"#;
//! let log = decode_events(input.as_bytes(), None).unwrap();
//!
//! let failing = log
//!     .events()
//!     .with_test()
//!     .with_package()
//!     .by_key()
//!     .filter_by_result(Outcome::Fail);
//! assert_eq!(failing.len(), 1);
//! ```

pub mod decoder;
pub mod error;
pub mod event;
pub mod index;

pub use decoder::{EventDecoder, EventLog, decode_events, decode_line};
pub use error::EventsError;
pub use event::{Action, COMMAND_LINE_PACKAGE, Outcome, TestEvent, TestKey, leaf_test_name};
pub use index::{EventGroups, Events};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::decoder::{EventLog, decode_events};
    pub use crate::error::EventsError;
    pub use crate::event::{Action, Outcome, TestEvent, TestKey};
    pub use crate::index::{EventGroups, Events};
}
