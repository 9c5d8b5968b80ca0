//! Package manifest parsing (`package.json`).
//!
//! Only a handful of fields are read. Help listings need nothing beyond
//! `description`; the rest describes how a host may execute the command.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::module::Alias;

/// Manifest file expected alongside every external command.
pub const MANIFEST_FILENAME: &str = "package.json";

/// Package manifest of an external command.
#[derive(Debug, Default, Deserialize)]
pub struct PackageManifest {
    /// Package name (e.g., "@scope/cli-build-webpack").
    pub name: Option<String>,

    /// Human-readable description shown in help listings.
    pub description: Option<String>,

    pub version: Option<String>,

    /// Executable, relative to the manifest, that implements the command.
    pub bin: Option<String>,

    #[serde(default)]
    pub alias: Option<Alias>,

    #[serde(default)]
    pub global: Option<bool>,
}

impl PackageManifest {
    /// Load the manifest from a command directory.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let manifest_path = dir.join(MANIFEST_FILENAME);
        let contents = std::fs::read_to_string(&manifest_path).map_err(|e| ManifestError::Io {
            path: manifest_path.clone(),
            source: e,
        })?;
        let manifest: Self = serde_json::from_str(&contents).map_err(|e| ManifestError::Parse {
            path: manifest_path,
            source: e,
        })?;
        Ok(manifest)
    }
}

/// Errors that can occur during manifest loading.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
