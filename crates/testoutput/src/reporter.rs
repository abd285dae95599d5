// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Failure reporting
//!
//! Decodes a test event stream, resolves every test's outcome, and emits one
//! error annotation per failing test, pointing at the test's declaration
//! when it can be found.

use std::io::{self, BufRead, Write};
use std::path::Path;

use testoutput_events::{EventLog, EventsError, Outcome, TestKey, decode_events};
use testoutput_source::SourceLocator;
use tracing::{debug, info};

use crate::commander::{Annotator, FileLocation, WorkflowCommander};

/// Errors that abort a reporting run
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Decoding the input failed
    #[error(transparent)]
    Events(#[from] EventsError),

    /// Writing an annotation failed
    #[error("Failed to write annotation: {0}")]
    Annotate(#[source] io::Error),
}

/// One emitted failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Failing test identity
    pub key: TestKey,
    /// Annotation text
    pub message: String,
    /// Declaration site, when found
    pub location: Option<FileLocation>,
}

/// Result of a reporting run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Events decoded
    pub events: usize,
    /// Distinct test identities seen
    pub tests: usize,
    /// Reports emitted, in key order
    pub failures: Vec<FailureReport>,
}

impl ReportSummary {
    /// Number of failing tests reported
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Report every failing test in an already decoded log
///
/// Failures are emitted in ascending key order. A failed source lookup is
/// logged and the report goes out without a location.
///
/// The message is the output text of the concluding `fail` event. `go test`
/// usually leaves that text empty, so in that case the test's captured
/// output, in timestamp order, is used instead.
///
/// # Errors
///
/// Returns `ReportError::Annotate` if the annotator fails to write.
pub fn report_log<A: Annotator + ?Sized>(
    log: &EventLog,
    locator: &mut SourceLocator,
    annotator: &mut A,
) -> Result<ReportSummary, ReportError> {
    let by_key = log.events().with_test().with_package().by_key();
    let failing = by_key.filter_by_result(Outcome::Fail);

    let mut summary = ReportSummary {
        events: log.len(),
        tests: by_key.len(),
        failures: Vec::with_capacity(failing.len()),
    };

    for (key, events) in &failing {
        let Some(result) = events.result() else {
            continue;
        };

        let message = if result.output.is_empty() {
            events.output()
        } else {
            result.output.clone()
        };

        let location = match locator.locate(&result.package, &result.test) {
            Ok(found) => found.as_ref().map(FileLocation::from),
            Err(e) => {
                debug!(test = %key, error = %e, "Could not locate test source");
                None
            }
        };

        annotator
            .error(&message, location.as_ref())
            .map_err(ReportError::Annotate)?;

        summary.failures.push(FailureReport {
            key: key.clone(),
            message,
            location,
        });
    }

    info!(
        events = summary.events,
        tests = summary.tests,
        failures = summary.failure_count(),
        "Reported test failures"
    );
    Ok(summary)
}

/// Decode `input` and report every failing test
///
/// # Errors
///
/// Returns `ReportError::Events` if reading the input or writing the
/// pass-through sink fails, and `ReportError::Annotate` if the annotator
/// fails to write.
pub fn report_failures<R: BufRead, A: Annotator + ?Sized>(
    input: R,
    passthrough: Option<&mut dyn Write>,
    locator: &mut SourceLocator,
    annotator: &mut A,
) -> Result<ReportSummary, ReportError> {
    let log = decode_events(input, passthrough)?;
    report_log(&log, locator, annotator)
}

/// Read events from `input` and write workflow error commands to `output`
///
/// With `passthrough` the test output is copied to `output` as well, ahead of
/// the commands. Returns the number of failing tests.
///
/// # Errors
///
/// Same as [`report_failures`].
pub fn output_failures<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    root_path: &Path,
    root_pkg: &str,
    passthrough: bool,
) -> Result<usize, ReportError> {
    let mut locator = SourceLocator::new(root_path, root_pkg);

    let log = if passthrough {
        decode_events(input, Some(&mut *output as &mut dyn Write))?
    } else {
        decode_events(input, None)?
    };

    let mut commander = WorkflowCommander::new(&mut *output);
    let summary = report_log(&log, &mut locator, &mut commander)?;
    output.flush().map_err(ReportError::Annotate)?;

    Ok(summary.failure_count())
}
