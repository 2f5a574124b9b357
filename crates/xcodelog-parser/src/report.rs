// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Report data model and aggregation
//!
//! The aggregator owns the output collections for one parse run: per-test
//! results grouped by test key, deduplicated build errors/warnings and
//! diagnostics, running totals, and the verbatim output archive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Outcome reported to a status sink when a test completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
}

impl std::fmt::Display for TestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "passed"),
            TestStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Observer for per-test completion events
///
/// Fired once per completed test so a live view (e.g. a test explorer) can
/// update while the log is still streaming in. Implementations must be
/// cheap; a no-op sink is always valid.
pub trait StatusSink {
    /// A test finished with the given status
    fn test_status_changed(&mut self, class: &str, name: &str, status: TestStatus);
}

/// Sink that discards all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn test_status_changed(&mut self, _class: &str, _name: &str, _status: TestStatus) {}
}

/// Result of one executed test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Target (module) the test belongs to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Test class name
    pub class: String,
    /// Test method name
    pub name: String,
    /// File declaring the test class, when the locator resolved it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<PathBuf>,
    /// 1-based line to point at for this result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    /// Elapsed time exactly as printed by the tool
    pub elapsed: String,
    /// Whether the runner reported the test as passed
    pub passed: bool,
    /// Failure message lines; empty for a passed test
    pub message: Vec<String>,
}

impl TestResult {
    /// Key used to group this result in the report
    ///
    /// `target/Class` when the target is known, `Class` alone otherwise.
    #[must_use]
    pub fn key(&self) -> String {
        match &self.target {
            Some(target) => format!("{}/{}", target, self.class),
            None => self.class.clone(),
        }
    }

    /// Status for notification purposes
    #[must_use]
    pub fn status(&self) -> TestStatus {
        if self.passed {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        }
    }
}

/// Source location of a build diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueLocation {
    /// Compiler-style `path:line:col` location
    Source {
        /// Source file
        filepath: PathBuf,
        /// 1-based line number
        line_number: u32,
        /// 1-based column number; 0 when the tool printed none
        column_number: u32,
    },
    /// Free-form source label (e.g. `ld`), no file location
    Labeled {
        /// The label in front of the diagnostic token
        label: String,
    },
    /// Bare diagnostic with nothing in front of the token
    Bare,
}

/// A compiler-emitted error or warning
///
/// Message is a non-empty ordered sequence; continuation lines are appended
/// in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildIssue {
    /// Where the diagnostic points
    pub location: IssueLocation,
    /// Message lines in arrival order
    pub message: Vec<String>,
}

impl BuildIssue {
    /// Duplicate-detection key: (filepath, line number, first message line)
    fn dedup_key(&self) -> (Option<&Path>, Option<u32>, Option<&str>) {
        let (filepath, line_number) = match &self.location {
            IssueLocation::Source {
                filepath,
                line_number,
                ..
            } => (Some(filepath.as_path()), Some(*line_number)),
            _ => (None, None),
        };
        (filepath, line_number, self.message.first().map(String::as_str))
    }
}

/// Secondary note correlating a failing test with an error reported in a
/// different source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the error was actually reported in
    pub filepath: PathBuf,
    /// Final component of `filepath`
    pub filename: String,
    /// 1-based line number in `filepath`
    pub line_number: u32,
    /// Message lines in arrival order
    pub message: Vec<String>,
}

impl Diagnostic {
    fn dedup_key(&self) -> (&Path, u32, Option<&str>) {
        (
            self.filepath.as_path(),
            self.line_number,
            self.message.first().map(String::as_str),
        )
    }
}

/// Structured report for one parse run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Every input line, unmodified, in arrival order
    pub output: Vec<String>,
    /// Test results grouped by test key, per-key insertion order
    pub tests: HashMap<String, Vec<TestResult>>,
    /// Number of completed tests
    pub tests_count: usize,
    /// Number of failed tests
    pub failed_tests_count: usize,
    /// Deduplicated build errors in arrival order
    pub build_errors: Vec<BuildIssue>,
    /// Deduplicated build warnings in arrival order
    pub build_warnings: Vec<BuildIssue>,
    /// Deduplicated cross-file failure diagnostics
    pub diagnostics: Vec<Diagnostic>,
    /// Detected result-bundle reference, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_bundle_path: Option<PathBuf>,
    /// When the report was finalized
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Check whether every completed test passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_tests_count == 0
    }

    /// Check whether the build produced any errors
    #[must_use]
    pub fn has_build_errors(&self) -> bool {
        !self.build_errors.is_empty()
    }

    /// Iterate over all failing test results
    pub fn failing_tests(&self) -> impl Iterator<Item = &TestResult> {
        self.tests.values().flatten().filter(|t| !t.passed)
    }
}

/// Accumulates completed records for one parse run
///
/// Owns the four output collections and the totals; flush operations
/// deduplicate at insertion.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    output: Vec<String>,
    tests: HashMap<String, Vec<TestResult>>,
    tests_count: usize,
    failed_tests_count: usize,
    build_errors: Vec<BuildIssue>,
    build_warnings: Vec<BuildIssue>,
    diagnostics: Vec<Diagnostic>,
    result_bundle_path: Option<PathBuf>,
}

impl ReportBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive one raw input line
    pub fn push_output_line(&mut self, line: &str) {
        self.output.push(line.to_string());
    }

    /// Record a completed build error, skipping duplicates
    pub fn push_error(&mut self, issue: BuildIssue) {
        if self
            .build_errors
            .iter()
            .any(|e| e.dedup_key() == issue.dedup_key())
        {
            debug!(?issue.location, "dropping duplicate build error");
            return;
        }
        self.build_errors.push(issue);
    }

    /// Record a completed build warning, skipping duplicates
    pub fn push_warning(&mut self, issue: BuildIssue) {
        if self
            .build_warnings
            .iter()
            .any(|w| w.dedup_key() == issue.dedup_key())
        {
            debug!(?issue.location, "dropping duplicate build warning");
            return;
        }
        self.build_warnings.push(issue);
    }

    /// Record a cross-file diagnostic, skipping duplicates
    pub fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if self
            .diagnostics
            .iter()
            .any(|d| d.dedup_key() == diagnostic.dedup_key())
        {
            return;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Store a completed test result and notify the sink
    ///
    /// Returns the key and per-key index of the stored record so the caller
    /// can update it in place when the finish marker arrives later.
    pub fn push_test(&mut self, test: TestResult, sink: &mut dyn StatusSink) -> (String, usize) {
        let key = test.key();
        debug!(key = %key, name = %test.name, passed = test.passed, "completed test");

        self.tests_count += 1;
        if !test.passed {
            self.failed_tests_count += 1;
        }
        sink.test_status_changed(&test.class, &test.name, test.status());

        let entries = self.tests.entry(key.clone()).or_default();
        entries.push(test);
        (key, entries.len() - 1)
    }

    /// Look up a previously stored test record for in-place update
    pub fn stored_test_mut(&mut self, key: &str, index: usize) -> Option<&mut TestResult> {
        self.tests.get_mut(key).and_then(|v| v.get_mut(index))
    }

    /// Record a detected result-bundle reference
    pub fn set_result_bundle(&mut self, path: PathBuf) {
        self.result_bundle_path = Some(path);
    }

    /// Number of completed tests so far
    #[must_use]
    pub fn tests_count(&self) -> usize {
        self.tests_count
    }

    /// Number of failed tests so far
    #[must_use]
    pub fn failed_tests_count(&self) -> usize {
        self.failed_tests_count
    }

    /// Reset all accumulated state to empty
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Finalize into an immutable [`Report`] snapshot
    #[must_use]
    pub fn finish(self) -> Report {
        Report {
            output: self.output,
            tests: self.tests,
            tests_count: self.tests_count,
            failed_tests_count: self.failed_tests_count,
            build_errors: self.build_errors,
            build_warnings: self.build_warnings,
            diagnostics: self.diagnostics,
            result_bundle_path: self.result_bundle_path,
            created_at: Utc::now(),
        }
    }
}
