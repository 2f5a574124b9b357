// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the line classifier and issue extraction

#![no_main]

use libfuzzer_sys::fuzz_target;

use xcodelog_parser::classify::{IssueKind, capture_issue, classify};

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let _ = classify(line);
        let _ = capture_issue(line, IssueKind::Error);
        let _ = capture_issue(line, IssueKind::Warning);
    }
});
