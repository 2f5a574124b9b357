// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the streaming parser
//!
//! Feeds arbitrary text line-by-line through `LogParser`, which must never
//! panic and must always finalize into a report.

#![no_main]

use libfuzzer_sys::fuzz_target;

use xcodelog_parser::LogParser;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut parser = LogParser::new();

        for line in input.lines() {
            parser.process_line(line);
        }

        let _ = parser.finish();
    }
});
