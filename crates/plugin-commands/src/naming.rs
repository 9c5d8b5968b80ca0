//! Group/name derivation from plugin paths.
//!
//! External commands are named by convention: `<prefix>-<group>-<name>`.
//! With the prefix `@scope/cli`, the path `node_modules/@scope/cli-build-webpack`
//! names the `webpack` command of the `build` group. The group is a single
//! dash-free segment; the name is everything after it, dashes included.

use std::path::Path;

use regex::Regex;

use crate::error::{CommandError, CommandResult};

/// Separator between prefix, group and name.
pub const NAME_SEPARATOR: char = '-';

/// Group and name derived from a command path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandName {
    pub group: String,
    pub name: String,
}

/// Build the naming pattern for `search_prefixes`.
///
/// A prefix may be given with or without its trailing separator. The prefix
/// must start a path component, and the group may not span components. When
/// several components carry a prefix, the last one names the command.
pub fn command_pattern<S: AsRef<str>>(search_prefixes: &[S]) -> CommandResult<Regex> {
    let alternatives: Vec<String> = search_prefixes
        .iter()
        .map(|prefix| prefix.as_ref().trim_end_matches(NAME_SEPARATOR))
        .filter(|prefix| !prefix.is_empty())
        .map(regex::escape)
        .collect();

    if alternatives.is_empty() {
        return Err(CommandError::NoSearchPrefixes);
    }

    let pattern = format!(
        r"^(?:.*[/\\])?(?:{})-([^-/\\]+)-(.+)$",
        alternatives.join("|")
    );
    Ok(Regex::new(&pattern)?)
}

/// Apply a pattern from [`command_pattern`] to `path`.
pub fn resolve_with(pattern: &Regex, path: &Path) -> CommandResult<CommandName> {
    let path_str = path.to_string_lossy();
    let captures = pattern
        .captures(&path_str)
        .ok_or_else(|| CommandError::UnresolvablePath {
            path: path.to_path_buf(),
        })?;

    Ok(CommandName {
        group: captures[1].to_string(),
        name: captures[2].to_string(),
    })
}

/// Derive the group and name of the command at `path`.
pub fn resolve_command_name<S: AsRef<str>>(
    path: &Path,
    search_prefixes: &[S],
) -> CommandResult<CommandName> {
    let pattern = command_pattern(search_prefixes)?;
    resolve_with(&pattern, path)
}
