// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! xcodelog-parser: structured parsing of xcodebuild console output
//!
//! This library crate turns the raw line-oriented console output of an
//! xcodebuild invocation (compiler diagnostics interleaved with XCTest
//! runner progress lines) into a structured [`Report`]: per-test results,
//! build errors, build warnings, auxiliary diagnostics, and the verbatim
//! output for archival.
//!
//! # Example
//!
//! ```
//! use xcodelog_parser::LogParser;
//!
//! let mut parser = LogParser::new();
//! parser.process_lines([
//!     "foo.swift:10:5: error: missing return",
//!     "",
//! ]);
//! let report = parser.finish();
//! assert_eq!(report.build_errors.len(), 1);
//! ```
//!
//! The parser is single-threaded and synchronous; one [`LogParser`] owns
//! all state for one run. Hosts with a source-file index implement
//! [`SourceLocator`] so results resolve to files and declaration lines;
//! hosts with a live test view implement [`StatusSink`].

pub mod classify;
pub mod error;
pub mod locate;
pub mod parser;
pub mod report;

pub use classify::{Classification, IssueCapture, IssueKind, TestFinish, classify};
pub use error::ParserError;
pub use locate::{NullLocator, SourceLocator, StaticLocator};
pub use parser::{LogParser, ParserState, parse_file, parse_str};
pub use report::{
    BuildIssue, Diagnostic, IssueLocation, NullSink, Report, StatusSink, TestResult, TestStatus,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::ParserError;
    pub use crate::locate::{NullLocator, SourceLocator, StaticLocator};
    pub use crate::parser::{LogParser, parse_file, parse_str};
    pub use crate::report::{Report, TestResult, TestStatus};
}
