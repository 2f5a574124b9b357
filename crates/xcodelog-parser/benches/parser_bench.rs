// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{Criterion, criterion_group, criterion_main};

use xcodelog_parser::LogParser;
use xcodelog_parser::classify::classify;

/// Synthesize a log with the line mix of a real build-and-test run
fn synthetic_log(tests: usize) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("/app/Sources/Model.swift:10:5: error: missing return".to_string());
    lines.push("    }".to_string());
    lines.push("    ^".to_string());
    lines.push(String::new());

    for i in 0..tests {
        lines.push(format!(
            "Test Case '-[MyAppTests.ParserTests test{i}]' started."
        ));
        if i % 5 == 0 {
            lines.push(format!(
                "/app/Tests/ParserTests.swift:{}: error: -[MyAppTests.ParserTests test{i}] : XCTAssertEqual failed",
                i + 1
            ));
            lines.push(String::new());
            lines.push(format!(
                "Test Case '-[MyAppTests.ParserTests test{i}]' failed (0.010 seconds)."
            ));
        } else {
            lines.push(format!(
                "Test Case '-[MyAppTests.ParserTests test{i}]' passed (0.002 seconds)."
            ));
        }
    }
    lines
}

fn parser_benchmark(c: &mut Criterion) {
    let log = synthetic_log(200);

    c.bench_function("parse_200_tests", |b| {
        b.iter(|| {
            let mut parser = LogParser::new();
            parser.process_lines(std::hint::black_box(&log));
            std::hint::black_box(parser.finish())
        })
    });

    c.bench_function("classify_line", |b| {
        b.iter(|| {
            std::hint::black_box(classify(std::hint::black_box(
                "Test Case '-[MyAppTests.ParserTests testTokenize]' passed (0.021 seconds).",
            )))
        })
    });
}

criterion_group!(benches, parser_benchmark);
criterion_main!(benches);
