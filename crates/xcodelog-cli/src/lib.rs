// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! xcodelog-cli: command-line front end for xcodelog-parser
//!
//! Reads a captured xcodebuild log from a file or stdin, runs one parse,
//! and writes the structured report as JSON.

pub mod config;

pub use config::{Config, ConfigError};
