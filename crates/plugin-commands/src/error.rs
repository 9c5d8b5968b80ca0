//! # Command Error Types
//!
//! Unified error handling for command loading and registry lookups.

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ManifestError;
use crate::module::InterfaceError;

/// Command operation result type
pub type CommandResult<T> = Result<T, CommandError>;

/// Error returned by a command's `run` or `eject` capability.
pub type RunError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while loading commands or looking them up in a [`GroupMap`].
///
/// [`GroupMap`]: crate::registry::GroupMap
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(
        "Path: {} returned module that does not satisfy the Command interface: {source}",
        .path.display()
    )]
    InvalidCommandModule {
        path: PathBuf,
        #[source]
        source: InterfaceError,
    },

    #[error("Path: {} does not match any configured command search prefix", .path.display())]
    UnresolvablePath { path: PathBuf },

    #[error("Unable to find command group: {group}")]
    GroupNotFound { group: String },

    #[error("Unable to find command: {command} for group: {group}")]
    CommandNotFound { group: String, command: String },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Failed to resolve module at {}: {reason}", .path.display())]
    ModuleResolution { path: PathBuf, reason: String },

    #[error("No command search prefixes configured")]
    NoSearchPrefixes,

    #[error("Invalid command naming pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl CommandError {
    /// Create a module resolution error
    pub fn module_resolution(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModuleResolution {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from a registry lookup rather than a load
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            CommandError::GroupNotFound { .. } | CommandError::CommandNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_module_message_carries_path() {
        let err = CommandError::InvalidCommandModule {
            path: PathBuf::from("/plugins/plugin-ctl-build-webpack"),
            source: InterfaceError {
                missing: vec!["run"],
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("/plugins/plugin-ctl-build-webpack"));
        assert!(msg.contains("does not satisfy the Command interface"));
    }

    #[test]
    fn test_lookup_error_classification() {
        assert!(CommandError::GroupNotFound {
            group: "serve".into()
        }
        .is_lookup_error());
        assert!(CommandError::CommandNotFound {
            group: "build".into(),
            command: "rollup".into()
        }
        .is_lookup_error());
        assert!(!CommandError::NoSearchPrefixes.is_lookup_error());
        assert!(!CommandError::module_resolution("/x", "missing").is_lookup_error());
    }
}
