// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for xcodelog-parser

use thiserror::Error;

/// Errors that can occur around a parse run
///
/// Line processing itself is infallible: malformed input is dropped, never
/// surfaced. Errors exist only on the convenience I/O entry points.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Error reading a captured log file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid log format
    #[error("Invalid log format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },
}
