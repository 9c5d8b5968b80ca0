//! Command discovery via 2-level directory scanning.
//!
//! For each search path, checks:
//! 1. Immediate subdirectories (`<path>/foo-cli-build-webpack`)
//! 2. Subdirectories of scope directories (`<path>/@scope/cli-build-webpack`)
//!
//! A directory qualifies when its name relative to the search path (`name` or
//! `@scope/name`) matches the command naming pattern. Components of the search
//! path itself never count.

use std::path::{Path, PathBuf};

use regex::Regex;

const SCOPE_MARKER: char = '@';

/// Discover all command directories under `search_paths` that match `pattern`.
///
/// Results are sorted so that registration order does not depend on the
/// filesystem's directory ordering.
pub fn discover_command_dirs(search_paths: &[PathBuf], pattern: &Regex) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for base in search_paths {
        if !base.is_dir() {
            tracing::debug!(?base, "Command search path does not exist, skipping");
            continue;
        }

        for subdir in subdirectories(base) {
            if is_scope_dir(&subdir) {
                // Level 2: scoped package (e.g., @scope/cli-build-webpack)
                let scope = dir_name(&subdir);
                for scoped in subdirectories(&subdir) {
                    let relative = format!("{scope}/{}", dir_name(&scoped));
                    if pattern.is_match(&relative) {
                        found.push(scoped);
                    }
                }
            } else if pattern.is_match(&dir_name(&subdir)) {
                found.push(subdir);
            }
        }
    }

    found.sort();
    found.dedup();
    tracing::debug!(count = found.len(), "Discovered command directories");
    found
}

fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect(),
        Err(e) => {
            tracing::debug!(?dir, error = %e, "Cannot read command search path");
            Vec::new()
        }
    }
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_scope_dir(dir: &Path) -> bool {
    dir_name(dir).starts_with(SCOPE_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::command_pattern;
    use std::fs;

    fn pattern() -> Regex {
        command_pattern(&["foo-cli", "@scope/cli"]).unwrap()
    }

    #[test]
    fn test_discover_immediate_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let webpack = dir.path().join("foo-cli-build-webpack");
        fs::create_dir(&webpack).unwrap();

        let found = discover_command_dirs(&[dir.path().to_path_buf()], &pattern());
        assert_eq!(found, vec![webpack]);
    }

    #[test]
    fn test_discover_scoped_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let scoped = dir.path().join("@scope").join("cli-serve-dist");
        fs::create_dir_all(&scoped).unwrap();

        let found = discover_command_dirs(&[dir.path().to_path_buf()], &pattern());
        assert_eq!(found, vec![scoped]);
    }

    #[test]
    fn test_discover_ignores_unmatched_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("lodash")).unwrap();
        fs::create_dir_all(dir.path().join("@other").join("cli-build-webpack")).unwrap();
        fs::create_dir(dir.path().join("foo-cli-build")).unwrap();

        let found = discover_command_dirs(&[dir.path().to_path_buf()], &pattern());
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_under_prefixed_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let modules = dir.path().join("foo-cli-my-plugins").join("node_modules");
        let webpack = modules.join("foo-cli-build-webpack");
        fs::create_dir_all(modules.join("lodash")).unwrap();
        fs::create_dir_all(modules.join("@types").join("node")).unwrap();
        fs::create_dir_all(&webpack).unwrap();

        let found = discover_command_dirs(&[modules], &pattern());
        assert_eq!(found, vec![webpack]);
    }

    #[test]
    fn test_discover_skips_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo-cli-build-webpack"), "not a dir").unwrap();

        let found = discover_command_dirs(&[dir.path().to_path_buf()], &pattern());
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_nonexistent_path() {
        let found = discover_command_dirs(&[PathBuf::from("/nonexistent/path")], &pattern());
        assert!(found.is_empty());
    }

    #[test]
    fn test_discover_multiple_search_paths_sorted() {
        let dir1 = tempfile::tempdir().unwrap();
        let dir2 = tempfile::tempdir().unwrap();

        let b = dir1.path().join("foo-cli-test-unit");
        let a = dir1.path().join("foo-cli-build-webpack");
        let c = dir2.path().join("foo-cli-create-app");
        for d in [&a, &b, &c] {
            fs::create_dir(d).unwrap();
        }

        let found = discover_command_dirs(
            &[dir1.path().to_path_buf(), dir2.path().to_path_buf()],
            &pattern(),
        );
        assert_eq!(found.len(), 3);
        let mut expected = vec![a, b, c];
        expected.sort();
        assert_eq!(found, expected);
    }
}
