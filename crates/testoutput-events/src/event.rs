// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test event types
//!
//! These mirror the records written by `go test -json` (see `go doc test2json`).

use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Package name `go test` reports for files passed on the command line
pub const COMMAND_LINE_PACKAGE: &str = "command-line-arguments";

/// The kind of a test event
///
/// Unrecognised actions are kept verbatim in [`Action::Other`] so that newer
/// versions of the test tool do not break decoding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    /// The test has started running
    Run,
    /// The test has been paused
    Pause,
    /// The test has continued running
    Cont,
    /// The test passed
    Pass,
    /// The benchmark printed log output but did not fail
    Bench,
    /// The test or benchmark failed
    Fail,
    /// The test printed output
    Output,
    /// The test was skipped or the package contained no tests
    Skip,
    /// The test binary has started (newer toolchains)
    Start,
    /// Any other action, passed through unmodified
    Other(String),
}

impl Action {
    /// The wire name of the action
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Run => "run",
            Self::Pause => "pause",
            Self::Cont => "cont",
            Self::Pass => "pass",
            Self::Bench => "bench",
            Self::Fail => "fail",
            Self::Output => "output",
            Self::Skip => "skip",
            Self::Start => "start",
            Self::Other(other) => other,
        }
    }

    /// The outcome this action concludes a test with, if it is terminal
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Pass => Some(Outcome::Pass),
            Self::Fail => Some(Outcome::Fail),
            _ => None,
        }
    }

    /// Whether the action concludes a test's lifecycle
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }
}

impl Default for Action {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        match value.as_str() {
            "run" => Self::Run,
            "pause" => Self::Pause,
            "cont" => Self::Cont,
            "pass" => Self::Pass,
            "bench" => Self::Bench,
            "fail" => Self::Fail,
            "output" => Self::Output,
            "skip" => Self::Skip,
            "start" => Self::Start,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Action {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Action> for String {
    fn from(value: Action) -> Self {
        match value {
            Action::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Test passed
    Pass,
    /// Test failed
    Fail,
}

/// Identity of one test execution: its package and test name
///
/// Keys are compared on their joined `package:test` form, which is also the
/// order failures are reported in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TestKey(String);

impl TestKey {
    /// Build the key for a package and test name
    #[must_use]
    pub fn new(package: &str, test: &str) -> Self {
        Self(format!("{package}:{test}"))
    }

    /// The joined key string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TestKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single event from `go test -json`
///
/// Field names match case-insensitively and a repeated field keeps its last
/// value. Missing or `null` fields decode as their empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventFields")]
pub struct TestEvent {
    /// When the event was emitted (RFC3339)
    #[serde(rename = "Time")]
    pub time: Option<DateTime<Utc>>,
    /// What happened
    #[serde(rename = "Action")]
    pub action: Action,
    /// Import path of the package under test
    #[serde(rename = "Package")]
    pub package: String,
    /// Test name; subtests are separated by `/`
    #[serde(rename = "Test")]
    pub test: String,
    /// Elapsed time in seconds (terminal events only)
    #[serde(rename = "Elapsed")]
    pub elapsed: Option<f64>,
    /// Captured output fragment
    #[serde(rename = "Output")]
    pub output: String,
}

impl TestEvent {
    /// The identity this event belongs to
    #[must_use]
    pub fn key(&self) -> TestKey {
        TestKey::new(&self.package, &self.test)
    }

    /// Name of the top-level test, with any subtest path removed
    ///
    /// `TestTable/case1` becomes `TestTable`.
    #[must_use]
    pub fn leaf_test_name(&self) -> &str {
        leaf_test_name(&self.test)
    }

    /// Whether the event belongs to a subtest
    #[must_use]
    pub fn is_subtest(&self) -> bool {
        self.test.contains('/')
    }

    /// Elapsed time as a duration, if present and representable
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

/// Strip the subtest path from a test name
#[must_use]
pub fn leaf_test_name(test: &str) -> &str {
    test.split('/').next().unwrap_or(test)
}

// ============================================================================
// Case-folded decoding
// ============================================================================

/// Object members keyed by their lower-cased name, later members winning
struct EventFields(Map<String, Value>);

impl<'de> Deserialize<'de> for EventFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = EventFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a test event object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<EventFields, A::Error> {
                let mut fields = Map::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    fields.insert(name.to_lowercase(), value);
                }
                Ok(EventFields(fields))
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

#[derive(Deserialize)]
struct FoldedEvent {
    #[serde(default)]
    time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    action: Action,
    #[serde(default, deserialize_with = "null_as_default")]
    package: String,
    #[serde(default, deserialize_with = "null_as_default")]
    test: String,
    #[serde(default)]
    elapsed: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    output: String,
}

impl TryFrom<EventFields> for TestEvent {
    type Error = serde_json::Error;

    fn try_from(fields: EventFields) -> Result<Self, Self::Error> {
        let event: FoldedEvent = serde_json::from_value(Value::Object(fields.0))?;
        Ok(Self {
            time: event.time,
            action: event.action,
            package: event.package,
            test: event.test,
            elapsed: event.elapsed,
            output: event.output,
        })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
