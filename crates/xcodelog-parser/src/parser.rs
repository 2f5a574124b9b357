// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Streaming state machine over classified xcodebuild output lines
//!
//! The parser consumes one line at a time, keeps a single in-progress
//! record, and emits completed records into the report aggregator. It never
//! fails on malformed input: lines that partially match a pattern are
//! dropped with the state unchanged, and the parser always terminates with
//! a [`Report`] for any finite input.
//!
//! # Example
//!
//! ```
//! use xcodelog_parser::LogParser;
//!
//! let mut parser = LogParser::new();
//! parser.process_line("Test Case '-[MyAppTests.LoginTests testLogin]' started.");
//! parser.process_line("Test Case '-[MyAppTests.LoginTests testLogin]' passed (0.002 seconds).");
//! let report = parser.finish();
//! assert_eq!(report.tests_count, 1);
//! ```

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::classify::{
    Classification, IssueCapture, IssueKind, TestFinish, capture_issue, classify, sanitize_message,
};
use crate::error::ParserError;
use crate::locate::{NullLocator, SourceLocator};
use crate::report::{
    BuildIssue, Diagnostic, IssueLocation, NullSink, Report, ReportBuilder, StatusSink, TestResult,
};

/// Message stored for a failure that carries no detail line
const FAILURE_PLACEHOLDER: &str = "Failing test";

/// Current position in the implicit grammar of the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Idle, no open record
    Begin,
    /// A test is executing, no failure seen yet
    TestStart,
    /// Accumulating a failing test's message
    TestError,
    /// Accumulating a build error's message
    BuildError,
    /// Accumulating a build warning's message
    BuildWarning,
}

/// Streaming parser for xcodebuild console output
///
/// Holds all state for one parse run. Feed lines with
/// [`process_line`](Self::process_line) (incrementally or all at once),
/// then take the report with [`finish`](Self::finish). Call
/// [`clear`](Self::clear) before reusing the parser for a new stream;
/// without it the state simply keeps accumulating, which is allowed but
/// rarely what you want.
pub struct LogParser {
    locator: Box<dyn SourceLocator>,
    sink: Box<dyn StatusSink>,
    project_root: PathBuf,
    state: ParserState,
    builder: ReportBuilder,
    /// In-progress test record, open between its started marker and flush
    current_test: Option<TestResult>,
    /// In-progress build error/warning record
    current_issue: Option<BuildIssue>,
    /// Real failure site when it differs from the test's own file
    pending_diagnostic: Option<(PathBuf, u32)>,
    /// Stored slot of the failing test most recently flushed, restored when
    /// the same test fails a second assertion before its finish marker
    last_flushed: Option<(String, usize)>,
    /// Whether any test has started in this run
    seen_test: bool,
}

impl LogParser {
    /// Create a parser with no source index and no status observer
    #[must_use]
    pub fn new() -> Self {
        Self {
            locator: Box::new(NullLocator),
            sink: Box::new(NullSink),
            project_root: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            state: ParserState::Begin,
            builder: ReportBuilder::new(),
            current_test: None,
            current_issue: None,
            pending_diagnostic: None,
            last_flushed: None,
            seen_test: false,
        }
    }

    /// Use the given source locator for file/declaration lookups
    #[must_use]
    pub fn with_locator(mut self, locator: Box<dyn SourceLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Send per-test completion events to the given sink
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn StatusSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Project root used to filter out warnings from dependencies and SDKs
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Current state, exposed for tests and diagnostics
    #[must_use]
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Process one line of output
    ///
    /// Never fails; malformed lines are archived verbatim and otherwise
    /// dropped.
    pub fn process_line(&mut self, line: &str) {
        self.builder.push_output_line(line);

        match classify(line) {
            Classification::TestStarted {
                target,
                class,
                name,
            } => self.on_test_started(target, class, name),
            Classification::TestFinished {
                format,
                passed,
                elapsed,
            } => self.on_test_finished(format, passed, elapsed),
            Classification::ErrorLine => self.on_error_line(line),
            Classification::WarningLine => self.on_warning_line(line),
            Classification::Annotation | Classification::Plain => self.on_continuation(line),
            Classification::Blank | Classification::NoteOrLint => self.on_flush_trigger(),
            Classification::ResultBundle(path) => self.builder.set_result_bundle(path),
        }
    }

    /// Process a whole sequence of lines
    pub fn process_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.process_line(line.as_ref());
        }
    }

    /// Reset all state to empty before a new run
    pub fn clear(&mut self) {
        self.builder.clear();
        self.state = ParserState::Begin;
        self.current_test = None;
        self.current_issue = None;
        self.pending_diagnostic = None;
        self.last_flushed = None;
        self.seen_test = false;
    }

    /// Finalize the run and return the report
    ///
    /// Whatever record is still open is left un-flushed: a trailing error
    /// block without its terminating blank line is dropped, matching the
    /// observed tool behavior.
    #[must_use]
    pub fn finish(self) -> Report {
        self.builder.finish()
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn on_test_started(&mut self, target: String, class: String, name: String) {
        debug!(module = %target, class = %class, name = %name, "test started");
        let filepath = self.locator.find_file_path(Some(&target), &class);
        self.current_issue = None;
        self.pending_diagnostic = None;
        self.last_flushed = None;
        self.seen_test = true;
        self.current_test = Some(TestResult {
            target: Some(target),
            class,
            name,
            filepath,
            line_number: None,
            elapsed: String::new(),
            passed: true,
            message: Vec::new(),
        });
        self.state = ParserState::TestStart;
    }

    fn on_error_line(&mut self, line: &str) {
        // An error marker terminates any open build record before it is
        // re-evaluated in the resulting state
        match self.state {
            ParserState::BuildError => self.flush_error(),
            ParserState::BuildWarning => self.flush_warning(),
            _ => {}
        }

        let Some(capture) = capture_issue(line, IssueKind::Error) else {
            // Internal runner annotation or malformed shape
            return;
        };

        match self.state {
            ParserState::TestStart => self.begin_test_error(&capture),
            ParserState::Begin if !self.seen_test => {
                debug!(message = %capture.message, "build error");
                self.current_issue = Some(BuildIssue {
                    location: issue_location(&capture),
                    message: vec![capture.message],
                });
                self.state = ParserState::BuildError;
            }
            ParserState::Begin => {
                // A second assertion failure of the test flushed just before:
                // restore its record and attribute this error to it
                if let Some((key, index)) = self.last_flushed.clone() {
                    if let Some(stored) = self.builder.stored_test_mut(&key, index) {
                        let mut restored = stored.clone();
                        restored.message = Vec::new();
                        self.current_test = Some(restored);
                        self.state = ParserState::TestStart;
                        self.begin_test_error(&capture);
                    }
                }
            }
            // TestError and anything else: dropped without state change
            _ => {}
        }
    }

    fn begin_test_error(&mut self, capture: &IssueCapture) {
        let Some(test) = self.current_test.as_mut() else {
            return;
        };

        test.passed = false;
        test.message = vec![sanitize_message(&capture.message)];

        if let (Some(err_path), Some(err_line)) = (&capture.filepath, capture.line_number) {
            match test.filepath.clone() {
                Some(test_path) if *err_path != test_path => {
                    // Failure reported in another file (e.g. a shared test
                    // helper): point the result at the test's own
                    // declaration and remember the real site
                    test.line_number = self.locator.find_declaration_line(&test_path, &test.name);
                    self.pending_diagnostic = Some((err_path.clone(), err_line));
                }
                _ => test.line_number = Some(err_line),
            }
        }

        self.state = ParserState::TestError;
    }

    fn on_warning_line(&mut self, line: &str) {
        match self.state {
            ParserState::BuildError => self.flush_error(),
            ParserState::BuildWarning => self.flush_warning(),
            ParserState::Begin => {}
            // Warnings never interrupt an executing test
            _ => return,
        }

        let Some(capture) = capture_issue(line, IssueKind::Warning) else {
            return;
        };
        self.current_issue = Some(BuildIssue {
            location: issue_location(&capture),
            message: vec![capture.message],
        });
        self.state = ParserState::BuildWarning;
    }

    fn on_continuation(&mut self, line: &str) {
        match self.state {
            ParserState::BuildError | ParserState::BuildWarning => {
                if let Some(issue) = self.current_issue.as_mut() {
                    issue.message.push(line.to_string());
                }
            }
            ParserState::TestError => {
                if let Some(test) = self.current_test.as_mut() {
                    test.message.push(line.to_string());
                }
            }
            // No open record: discarded
            _ => {}
        }
    }

    fn on_flush_trigger(&mut self) {
        match self.state {
            ParserState::BuildError => self.flush_error(),
            ParserState::BuildWarning => self.flush_warning(),
            ParserState::TestError => self.flush_test(),
            _ => {}
        }
    }

    fn on_test_finished(&mut self, format: TestFinish, passed: bool, elapsed: String) {
        // XCTest separates an assertion block from the finish marker with a
        // blank line; tolerate its absence
        if self.state == ParserState::TestError {
            self.flush_test();
        }

        match format {
            TestFinish::Interactive { .. } => {
                if let Some((key, index)) = self.last_flushed.take() {
                    // The test was already stored when its error block
                    // flushed; confirm result and timing in place
                    if let Some(stored) = self.builder.stored_test_mut(&key, index) {
                        stored.passed = passed;
                        stored.elapsed = elapsed;
                    }
                    self.current_test = None;
                } else if let Some(mut test) = self.current_test.take() {
                    test.passed = passed;
                    test.elapsed = elapsed;
                    if !passed && test.message.is_empty() {
                        test.message = vec![FAILURE_PLACEHOLDER.to_string()];
                    }
                    self.builder.push_test(test, &mut *self.sink);
                }
                // A finish marker without a started marker is dropped
            }
            TestFinish::TestPlan { class, name } => {
                // No started marker exists in this format; the whole record
                // comes from this one line plus locator lookups
                let filepath = self.locator.find_file_path(None, &class);
                let target = filepath
                    .as_deref()
                    .and_then(|p| self.locator.find_target_for_file(p));
                let line_number = filepath
                    .as_deref()
                    .and_then(|p| self.locator.find_declaration_line(p, &name));
                let message = if passed {
                    Vec::new()
                } else {
                    vec![FAILURE_PLACEHOLDER.to_string()]
                };

                self.seen_test = true;
                self.current_test = None;
                self.last_flushed = None;
                self.pending_diagnostic = None;
                self.builder.push_test(
                    TestResult {
                        target,
                        class,
                        name,
                        filepath,
                        line_number,
                        elapsed,
                        passed,
                        message,
                    },
                    &mut *self.sink,
                );
            }
        }

        self.state = ParserState::Begin;
    }

    // ------------------------------------------------------------------
    // Flushes
    // ------------------------------------------------------------------

    fn flush_error(&mut self) {
        if let Some(issue) = self.current_issue.take() {
            self.builder.push_error(issue);
        }
        self.state = ParserState::Begin;
    }

    fn flush_warning(&mut self) {
        if let Some(issue) = self.current_issue.take() {
            if self.warning_in_project(&issue) {
                self.builder.push_warning(issue);
            } else {
                debug!(?issue.location, "dropping warning outside project root");
            }
        }
        self.state = ParserState::Begin;
    }

    fn flush_test(&mut self) {
        let Some(test) = self.current_test.take() else {
            self.state = ParserState::Begin;
            return;
        };

        let message = test.message.clone();
        let line_number = test.line_number;

        if let Some((key, index)) = self.last_flushed.clone() {
            // Second error block of the same test: keep the stored record,
            // latest failure content wins, counters untouched
            if let Some(stored) = self.builder.stored_test_mut(&key, index) {
                stored.message = message.clone();
                stored.line_number = line_number;
            }
        } else {
            let slot = self.builder.push_test(test, &mut *self.sink);
            self.last_flushed = Some(slot);
        }

        if let Some((filepath, err_line)) = self.pending_diagnostic.take() {
            let filename = filepath
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.builder.push_diagnostic(Diagnostic {
                filepath,
                filename,
                line_number: err_line,
                message,
            });
        }

        self.state = ParserState::Begin;
    }

    /// Warnings from dependencies and SDKs are filtered by file path
    fn warning_in_project(&self, issue: &BuildIssue) -> bool {
        match &issue.location {
            IssueLocation::Source { filepath, .. } => {
                filepath.is_relative() || filepath.starts_with(&self.project_root)
            }
            _ => true,
        }
    }
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

fn issue_location(capture: &IssueCapture) -> IssueLocation {
    match (&capture.filepath, capture.line_number) {
        (Some(filepath), Some(line_number)) => IssueLocation::Source {
            filepath: filepath.clone(),
            line_number,
            column_number: capture.column_number.unwrap_or(0),
        },
        _ => match &capture.label {
            Some(label) => IssueLocation::Labeled {
                label: label.clone(),
            },
            None => IssueLocation::Bare,
        },
    }
}

// ============================================================================
// Convenience entry points
// ============================================================================

/// Parse a whole captured log held in memory
#[must_use]
pub fn parse_str(text: &str) -> Report {
    let mut parser = LogParser::new();
    parser.process_lines(text.lines());
    parser.finish()
}

/// Parse a captured log from a file on disk
///
/// # Errors
///
/// Returns `ParserError::Io` if the file cannot be read.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Report, ParserError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_str(&text))
}
