// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! xcodelog: turn captured xcodebuild output into a structured JSON report
//!
//! This binary crate hosts the parser for standalone use; no source-file
//! index exists outside an editor session, so results carry whatever the
//! log itself provides.

use std::io::Read;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

use xcodelog_cli::Config;
use xcodelog_parser::LogParser;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so the JSON report owns stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    config.validate()?;

    let text = match &config.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    debug!(lines = text.lines().count(), "read input");

    let mut parser = LogParser::new();
    if let Some(root) = config.project_root() {
        parser = parser.with_project_root(root);
    }
    parser.process_lines(text.lines());
    let report = parser.finish();

    info!(
        tests = report.tests_count,
        failed = report.failed_tests_count,
        errors = report.build_errors.len(),
        warnings = report.build_warnings.len(),
        "parse complete"
    );

    let json = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &config.output {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    if config.fail_on_issues && (report.has_build_errors() || report.failed_tests_count > 0) {
        std::process::exit(1);
    }

    Ok(())
}
