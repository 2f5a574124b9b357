// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line classification for xcodebuild console output
//!
//! This module provides the pure, stateless first stage of the parse
//! pipeline: one input line in, one [`Classification`] out. Patterns are
//! tested in a fixed priority order so precedence stays explicit and
//! testable in isolation.
//!
//! # Example
//!
//! ```
//! use xcodelog_parser::classify::{classify, Classification};
//!
//! let tag = classify("Test Case '-[MyAppTests.LoginTests testLogin]' started.");
//! assert!(matches!(tag, Classification::TestStarted { .. }));
//! ```

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

// ============================================================================
// Patterns
// ============================================================================

/// `Test Case '-[Target.Class testName]' started.`
static TEST_STARTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Test Case\s+'-\[(\w+)\.(\w+)\s+(\w+)\]' started\.?\s*$")
        .expect("invalid TEST_STARTED pattern")
});

/// `Test Case '-[Target.Class testName]' passed (0.123 seconds).`
static TEST_FINISHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Test Case\s+'-\[(\w+)\.(\w+)\s+(\w+)\]' (passed|failed) \((\d+\.\d+) seconds\)\.?\s*$")
        .expect("invalid TEST_FINISHED pattern")
});

/// `Test case 'Class.testName()' passed on 'iPhone 16' (0.123 seconds)`
///
/// Emitted for autogenerated test plans; there is no matching "started" line.
static TEST_PLAN_FINISHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Test case\s+'(\w+)\.(\w+)\(.*\)' (passed|failed) on '.+' \((\d+\.\d+) seconds\)\.?\s*$")
        .expect("invalid TEST_PLAN_FINISHED pattern")
});

/// `path:line:col: error: message`
static LOCATED_ISSUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?):(\d+):(\d+):\s+(error|warning):\s+(.*\S)\s*$")
        .expect("invalid LOCATED_ISSUE pattern")
});

/// `path:line: error: message` — the XCTest assertion shape, no column
static LINE_ONLY_ISSUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?):(\d+):\s+(error|warning):\s+(.*\S)\s*$")
        .expect("invalid LINE_ONLY_ISSUE pattern")
});

/// `label: error: message` — no source location at all
static LABELED_ISSUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^:]+?):\s+(error|warning):\s+(.*\S)\s*$")
        .expect("invalid LABELED_ISSUE pattern")
});

/// `error: message` with nothing in front of the token
static BARE_ISSUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(error|warning):\s+(.*\S)\s*$").expect("invalid BARE_ISSUE pattern")
});

/// The runner's own bracketed log marker at line start; such lines are
/// internal annotations, not user diagnostics
static INTERNAL_LOG_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-\[[\w.]+\s+\w+\]").expect("invalid INTERNAL_LOG_MARKER pattern")
});

/// `-[Target.Class testName] : ` prefix the runner puts on assertion messages
static MESSAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\[[\w.]+\s+\w+\]\s*:\s*").expect("invalid MESSAGE_MARKER pattern")
});

/// A detected reference to a result bundle
static RESULT_BUNDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\S+\.xcresult)/?\s*$").expect("invalid RESULT_BUNDLE pattern")
});

// ============================================================================
// Classification
// ============================================================================

/// How a test-finished line was encoded on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestFinish {
    /// Interactive-runner format: `Test Case '-[Target.Class testName]' ...`
    Interactive {
        /// Target (module) name
        target: String,
        /// Test class name
        class: String,
        /// Test method name
        name: String,
    },
    /// Autogenerated test-plan format: `Test case 'Class.testName(...)' ...`
    ///
    /// Carries no target and has no separate "started" line.
    TestPlan {
        /// Test class name
        class: String,
        /// Test method name
        name: String,
    },
}

/// Tentative event tag for one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A test case began executing
    TestStarted {
        /// Target (module) name
        target: String,
        /// Test class name
        class: String,
        /// Test method name
        name: String,
    },
    /// A test case finished
    TestFinished {
        /// Wire format and test identity
        format: TestFinish,
        /// Whether the runner reported `passed`
        passed: bool,
        /// Elapsed time as printed by the tool
        elapsed: String,
    },
    /// Line containing the `error:` token
    ErrorLine,
    /// Line containing the `warning:` token
    WarningLine,
    /// Caret/tilde column annotation, always a continuation
    Annotation,
    /// Blank line, flushes any open record
    Blank,
    /// `note:` or linting output, flushes any open record
    NoteOrLint,
    /// Reference to a result bundle
    ResultBundle(PathBuf),
    /// Anything else
    Plain,
}

/// Classify one line of xcodebuild output
///
/// Pure function; patterns are evaluated in priority order and the first
/// match wins.
#[must_use]
pub fn classify(line: &str) -> Classification {
    if let Some(caps) = TEST_STARTED.captures(line) {
        return Classification::TestStarted {
            target: caps[1].to_string(),
            class: caps[2].to_string(),
            name: caps[3].to_string(),
        };
    }

    if let Some(caps) = TEST_FINISHED.captures(line) {
        return Classification::TestFinished {
            format: TestFinish::Interactive {
                target: caps[1].to_string(),
                class: caps[2].to_string(),
                name: caps[3].to_string(),
            },
            passed: &caps[4] == "passed",
            elapsed: caps[5].to_string(),
        };
    }

    if let Some(caps) = TEST_PLAN_FINISHED.captures(line) {
        return Classification::TestFinished {
            format: TestFinish::TestPlan {
                class: caps[1].to_string(),
                name: caps[2].to_string(),
            },
            passed: &caps[3] == "passed",
            elapsed: caps[4].to_string(),
        };
    }

    if line.contains("error:") {
        return Classification::ErrorLine;
    }

    if line.contains("warning:") {
        return Classification::WarningLine;
    }

    if is_annotation(line) {
        return Classification::Annotation;
    }

    if line.trim().is_empty() {
        return Classification::Blank;
    }

    if line.contains("note:") || line.trim_start().starts_with("Linting") {
        return Classification::NoteOrLint;
    }

    if let Some(caps) = RESULT_BUNDLE.captures(line) {
        return Classification::ResultBundle(PathBuf::from(&caps[1]));
    }

    Classification::Plain
}

/// Check for a caret/tilde column-annotation line
///
/// The compiler prints these under a diagnostic to point at a column; they
/// are swallowed as continuations, never treated as terminators.
fn is_annotation(line: &str) -> bool {
    let mut seen_marker = false;
    for c in line.chars() {
        match c {
            '~' | '^' => seen_marker = true,
            ' ' | '\t' => {}
            _ => return false,
        }
    }
    seen_marker
}

// ============================================================================
// Issue extraction
// ============================================================================

/// Which diagnostic token an [`IssueCapture`] was extracted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// `error:` token
    Error,
    /// `warning:` token
    Warning,
}

impl IssueKind {
    fn token(self) -> &'static str {
        match self {
            IssueKind::Error => "error",
            IssueKind::Warning => "warning",
        }
    }
}

/// Fields extracted from an error or warning line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCapture {
    /// Source file, when the line carried a location
    pub filepath: Option<PathBuf>,
    /// 1-based line number, when located
    pub line_number: Option<u32>,
    /// 1-based column number, when the compiler printed one
    pub column_number: Option<u32>,
    /// Free-form source label, for the `label: error:` shape
    pub label: Option<String>,
    /// First message line
    pub message: String,
}

/// Extract location and message from an error/warning line
///
/// Shapes are tried most- to least-specific: `path:line:col:`, `path:line:`,
/// `label:`, then the bare token. Returns `None` when the line does not
/// carry the requested token with a message, or when it is the runner's own
/// internal log annotation.
#[must_use]
pub fn capture_issue(line: &str, kind: IssueKind) -> Option<IssueCapture> {
    if INTERNAL_LOG_MARKER.is_match(line) {
        return None;
    }

    if let Some(caps) = LOCATED_ISSUE.captures(line) {
        if &caps[4] == kind.token() {
            return Some(IssueCapture {
                filepath: Some(PathBuf::from(&caps[1])),
                line_number: caps[2].parse().ok(),
                column_number: caps[3].parse().ok(),
                label: None,
                message: caps[5].to_string(),
            });
        }
    }

    if let Some(caps) = LINE_ONLY_ISSUE.captures(line) {
        if &caps[3] == kind.token() {
            return Some(IssueCapture {
                filepath: Some(PathBuf::from(&caps[1])),
                line_number: caps[2].parse().ok(),
                column_number: None,
                label: None,
                message: caps[4].to_string(),
            });
        }
    }

    if let Some(caps) = LABELED_ISSUE.captures(line) {
        if &caps[2] == kind.token() {
            return Some(IssueCapture {
                filepath: None,
                line_number: None,
                column_number: None,
                label: Some(caps[1].trim().to_string()),
                message: caps[3].to_string(),
            });
        }
    }

    if let Some(caps) = BARE_ISSUE.captures(line) {
        if &caps[1] == kind.token() {
            return Some(IssueCapture {
                filepath: None,
                line_number: None,
                column_number: None,
                label: None,
                message: caps[2].to_string(),
            });
        }
    }

    None
}

/// Strip the runner's `-[Target.Class testName] : ` prefix from an
/// assertion message, when present
#[must_use]
pub fn sanitize_message(message: &str) -> String {
    MESSAGE_MARKER.replace(message, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_classify_test_started() {
        let tag = classify("Test Case '-[MyAppTests.LoginTests testLogin]' started.");
        assert_eq!(
            tag,
            Classification::TestStarted {
                target: "MyAppTests".to_string(),
                class: "LoginTests".to_string(),
                name: "testLogin".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_test_passed() {
        let tag = classify("Test Case '-[MyAppTests.LoginTests testLogin]' passed (0.031 seconds).");
        assert_eq!(
            tag,
            Classification::TestFinished {
                format: TestFinish::Interactive {
                    target: "MyAppTests".to_string(),
                    class: "LoginTests".to_string(),
                    name: "testLogin".to_string(),
                },
                passed: true,
                elapsed: "0.031".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_test_failed() {
        let tag = classify("Test Case '-[MyAppTests.LoginTests testLogin]' failed (1.200 seconds).");
        match tag {
            Classification::TestFinished { passed, elapsed, .. } => {
                assert!(!passed);
                assert_eq!(elapsed, "1.200");
            }
            other => panic!("Expected TestFinished, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_test_plan_format() {
        let tag = classify("Test case 'LoginTests.testLogin()' passed on 'iPhone 16' (0.005 seconds)");
        assert_eq!(
            tag,
            Classification::TestFinished {
                format: TestFinish::TestPlan {
                    class: "LoginTests".to_string(),
                    name: "testLogin".to_string(),
                },
                passed: true,
                elapsed: "0.005".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_error_and_warning() {
        assert_eq!(
            classify("/app/Sources/Foo.swift:10:5: error: missing return"),
            Classification::ErrorLine
        );
        assert_eq!(
            classify("/app/Sources/Foo.swift:3:1: warning: unused variable"),
            Classification::WarningLine
        );
    }

    #[test]
    fn test_error_takes_priority_over_warning_token() {
        // Both tokens present; error wins by pattern order
        assert_eq!(
            classify("Foo.swift:1:1: error: bad thing (was warning: before)"),
            Classification::ErrorLine
        );
    }

    #[test]
    fn test_classify_annotation() {
        assert_eq!(classify("        ~~~~^~~~~"), Classification::Annotation);
        assert_eq!(classify("^"), Classification::Annotation);
        assert_eq!(classify("   ~~ x ~~"), Classification::Plain);
    }

    #[test]
    fn test_classify_blank_and_note() {
        assert_eq!(classify(""), Classification::Blank);
        assert_eq!(classify("   \t "), Classification::Blank);
        assert_eq!(
            classify("Foo.swift:4:1: note: add 'return' here"),
            Classification::NoteOrLint
        );
        assert_eq!(classify("Linting Swift files in ..."), Classification::NoteOrLint);
    }

    #[test]
    fn test_classify_result_bundle() {
        let tag = classify("\t/tmp/DD/Logs/Test/Run-2026.xcresult");
        assert_eq!(
            tag,
            Classification::ResultBundle(PathBuf::from("/tmp/DD/Logs/Test/Run-2026.xcresult"))
        );
    }

    #[test]
    fn test_classify_plain() {
        assert_eq!(classify("Build settings from command line:"), Classification::Plain);
    }

    #[test]
    fn test_capture_located_error() {
        let cap = capture_issue("/app/Foo.swift:10:5: error: missing return", IssueKind::Error)
            .expect("Should capture");
        assert_eq!(cap.filepath, Some(PathBuf::from("/app/Foo.swift")));
        assert_eq!(cap.line_number, Some(10));
        assert_eq!(cap.column_number, Some(5));
        assert_eq!(cap.message, "missing return");
    }

    #[test]
    fn test_capture_line_only_error() {
        let cap = capture_issue(
            "/app/Tests/LoginTests.swift:42: error: -[MyAppTests.LoginTests testLogin] : XCTAssertEqual failed",
            IssueKind::Error,
        )
        .expect("Should capture");
        assert_eq!(cap.line_number, Some(42));
        assert_eq!(cap.column_number, None);
        assert_eq!(
            sanitize_message(&cap.message),
            "XCTAssertEqual failed"
        );
    }

    #[test]
    fn test_capture_labeled_error() {
        let cap = capture_issue("ld: error: undefined symbol _main", IssueKind::Error)
            .expect("Should capture");
        assert_eq!(cap.filepath, None);
        assert_eq!(cap.label, Some("ld".to_string()));
        assert_eq!(cap.message, "undefined symbol _main");
    }

    #[test]
    fn test_capture_bare_error() {
        let cap = capture_issue("error: exportArchive failed", IssueKind::Error)
            .expect("Should capture");
        assert_eq!(cap.filepath, None);
        assert_eq!(cap.label, None);
        assert_eq!(cap.message, "exportArchive failed");
    }

    #[test]
    fn test_capture_ignores_internal_log_marker() {
        let cap = capture_issue(
            "-[MyAppTests.LoginTests testLogin] : error: internal runner chatter",
            IssueKind::Error,
        );
        assert!(cap.is_none());
    }

    #[test]
    fn test_capture_wrong_token_returns_none() {
        assert!(capture_issue("Foo.swift:1:1: warning: w", IssueKind::Error).is_none());
        assert!(capture_issue("Foo.swift:1:1: error: e", IssueKind::Warning).is_none());
    }

    #[test]
    fn test_capture_missing_message_returns_none() {
        // Token present but nothing after it: malformed, silently dropped
        assert!(capture_issue("Foo.swift:1:1: error: ", IssueKind::Error).is_none());
        assert!(capture_issue("error:", IssueKind::Error).is_none());
    }

    #[test]
    fn test_sanitize_message_passthrough() {
        assert_eq!(sanitize_message("plain message"), "plain message");
        assert_eq!(
            sanitize_message("-[MyAppTests.LoginTests testLogin] : XCTAssertTrue failed"),
            "XCTAssertTrue failed"
        );
    }

    #[test]
    fn test_classification_is_idempotent() {
        let lines = [
            "Test Case '-[A.B testC]' started.",
            "/x.swift:1:2: error: boom",
            "",
            "     ~^~",
            "random output",
        ];
        for line in lines {
            assert_eq!(classify(line), classify(line));
        }
    }
}
