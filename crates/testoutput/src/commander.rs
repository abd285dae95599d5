// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! GitHub Actions workflow commands
//!
//! Workflow commands are lines of the form `::name key=value,...::data`
//! written to a step's stdout, which the runner turns into annotations,
//! masked values and so on.
//!
//! <https://docs.github.com/en/actions/reference/workflow-commands-for-github-actions>

use std::io::{self, Write};

use testoutput_source::SourceLocation;

/// Optional file position attached to a message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLocation {
    /// Path relative to the repository root
    pub file: String,
    /// 1-based line
    pub line: usize,
    /// Column, 0 when unknown
    pub col: usize,
}

impl From<&SourceLocation> for FileLocation {
    fn from(location: &SourceLocation) -> Self {
        Self {
            file: location.file.clone(),
            line: location.line,
            col: 0,
        }
    }
}

/// Receives one error report per failing test
pub trait Annotator {
    /// Report an error, optionally pointing at a file position
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    fn error(&mut self, message: &str, location: Option<&FileLocation>) -> io::Result<()>;
}

/// Writes workflow commands to an output stream
#[derive(Debug)]
pub struct WorkflowCommander<W> {
    out: W,
}

impl<W: Write> WorkflowCommander<W> {
    /// Create a commander writing to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Create or update an environment variable for later steps
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn set_env(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.command("set-env", &[("name", name.to_string())], value)
    }

    /// Set an output parameter of the step
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.command("set-output", &[("name", name.to_string())], value)
    }

    /// Prepend a directory to `PATH` for later steps
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn add_path(&mut self, path: &str) -> io::Result<()> {
        self.command("add-path", &[], path)
    }

    /// Hide a value from the log
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn add_mask(&mut self, value: &str) -> io::Result<()> {
        self.command("add-mask", &[], value)
    }

    /// Print a debug message (visible with `ACTIONS_STEP_DEBUG`)
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn debug(&mut self, message: &str, location: Option<&FileLocation>) -> io::Result<()> {
        self.log("debug", message, location)
    }

    /// Create a notice annotation
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn notice(&mut self, message: &str, location: Option<&FileLocation>) -> io::Result<()> {
        self.log("notice", message, location)
    }

    /// Create a warning annotation
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn warning(&mut self, message: &str, location: Option<&FileLocation>) -> io::Result<()> {
        self.log("warning", message, location)
    }

    /// Create an error annotation
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn error(&mut self, message: &str, location: Option<&FileLocation>) -> io::Result<()> {
        self.log("error", message, location)
    }

    /// Stop processing workflow commands until `resume_commands` with the same token
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn stop_commands(&mut self, token: &str) -> io::Result<()> {
        self.command("stop-commands", &[], token)
    }

    /// Resume processing workflow commands
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn resume_commands(&mut self, token: &str) -> io::Result<()> {
        self.command(token, &[], "")
    }

    fn log(
        &mut self,
        level: &str,
        message: &str,
        location: Option<&FileLocation>,
    ) -> io::Result<()> {
        match location {
            None => self.command(level, &[], message),
            Some(loc) => self.command(
                level,
                &[
                    ("file", loc.file.clone()),
                    ("line", loc.line.to_string()),
                    ("col", loc.col.to_string()),
                ],
                message,
            ),
        }
    }

    fn command(&mut self, name: &str, props: &[(&str, String)], data: &str) -> io::Result<()> {
        let mut line = format!("::{name}");
        for (i, (key, value)) in props.iter().enumerate() {
            line.push(if i == 0 { ' ' } else { ',' });
            line.push_str(key);
            line.push('=');
            line.push_str(&escape_property(value));
        }
        line.push_str("::");
        line.push_str(&escape_data(data));
        line.push('\n');
        self.out.write_all(line.as_bytes())
    }
}

impl<W: Write> Annotator for WorkflowCommander<W> {
    fn error(&mut self, message: &str, location: Option<&FileLocation>) -> io::Result<()> {
        WorkflowCommander::error(self, message, location)
    }
}

fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
