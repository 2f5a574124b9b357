// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Source locator contract
//!
//! The parser cross-references test classes against a source-file index to
//! resolve file paths, declaration lines and owning targets. Building that
//! index is the host's job (scan the workspace up front, or cache lookups);
//! this module defines only the contract plus two in-tree implementations:
//! [`NullLocator`] for hosts without an index and [`StaticLocator`] backed
//! by in-memory maps.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Resolves test identities to source locations
///
/// Lookups are synchronous and must either return promptly or return
/// "not found"; every miss is non-fatal for the parser.
pub trait SourceLocator {
    /// Find the file declaring `class`, optionally narrowed by target
    fn find_file_path(&self, target: Option<&str>, class: &str) -> Option<PathBuf>;

    /// Find the 1-based declaration line of `method` inside `path`
    fn find_declaration_line(&self, path: &Path, method: &str) -> Option<u32>;

    /// Find the target owning `path`
    fn find_target_for_file(&self, path: &Path) -> Option<String>;
}

/// Locator that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLocator;

impl SourceLocator for NullLocator {
    fn find_file_path(&self, _target: Option<&str>, _class: &str) -> Option<PathBuf> {
        None
    }

    fn find_declaration_line(&self, _path: &Path, _method: &str) -> Option<u32> {
        None
    }

    fn find_target_for_file(&self, _path: &Path) -> Option<String> {
        None
    }
}

/// In-memory locator backed by pre-scanned maps
///
/// Hosts that index the workspace ahead of a parse load the index here;
/// tests use it to script lookups.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    classes: HashMap<String, PathBuf>,
    declarations: HashMap<(PathBuf, String), u32>,
    targets: HashMap<PathBuf, String>,
}

impl StaticLocator {
    /// Create an empty locator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the file declaring a test class
    #[must_use]
    pub fn with_class(mut self, class: &str, path: impl Into<PathBuf>) -> Self {
        self.classes.insert(class.to_string(), path.into());
        self
    }

    /// Register the declaration line of a method inside a file
    #[must_use]
    pub fn with_declaration(mut self, path: impl Into<PathBuf>, method: &str, line: u32) -> Self {
        self.declarations
            .insert((path.into(), method.to_string()), line);
        self
    }

    /// Register the target owning a file
    #[must_use]
    pub fn with_target(mut self, path: impl Into<PathBuf>, target: &str) -> Self {
        self.targets.insert(path.into(), target.to_string());
        self
    }
}

impl SourceLocator for StaticLocator {
    fn find_file_path(&self, _target: Option<&str>, class: &str) -> Option<PathBuf> {
        self.classes.get(class).cloned()
    }

    fn find_declaration_line(&self, path: &Path, method: &str) -> Option<u32> {
        self.declarations
            .get(&(path.to_path_buf(), method.to_string()))
            .copied()
    }

    fn find_target_for_file(&self, path: &Path) -> Option<String> {
        self.targets.get(path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_null_locator_always_misses() {
        let locator = NullLocator;
        assert!(locator.find_file_path(None, "LoginTests").is_none());
        assert!(
            locator
                .find_declaration_line(Path::new("a.swift"), "testA")
                .is_none()
        );
        assert!(locator.find_target_for_file(Path::new("a.swift")).is_none());
    }

    #[test]
    fn test_static_locator_lookups() {
        let locator = StaticLocator::new()
            .with_class("LoginTests", "/app/Tests/LoginTests.swift")
            .with_declaration("/app/Tests/LoginTests.swift", "testLogin", 12)
            .with_target("/app/Tests/LoginTests.swift", "MyAppTests");

        assert_eq!(
            locator.find_file_path(Some("MyAppTests"), "LoginTests"),
            Some(PathBuf::from("/app/Tests/LoginTests.swift"))
        );
        assert_eq!(
            locator.find_declaration_line(Path::new("/app/Tests/LoginTests.swift"), "testLogin"),
            Some(12)
        );
        assert_eq!(
            locator.find_target_for_file(Path::new("/app/Tests/LoginTests.swift")),
            Some("MyAppTests".to_string())
        );
        assert!(locator.find_file_path(None, "OtherTests").is_none());
    }
}
