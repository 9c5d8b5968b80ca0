//! CLI configuration: where plugin commands live and how they are named.

pub(crate) mod loader;

pub(crate) use loader::{expand_path, load_cli_config};

use serde::Deserialize;

/// Prefix used when no `search-prefixes` are configured.
pub(crate) const DEFAULT_SEARCH_PREFIX: &str = "plugin-ctl";

fn default_search_prefixes() -> Vec<String> {
    vec![DEFAULT_SEARCH_PREFIX.to_string()]
}

/// CLI-specific configuration for command discovery.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// Naming prefixes of external commands (e.g., "@scope/cli", "plugin-ctl").
    #[serde(default = "default_search_prefixes")]
    pub search_prefixes: Vec<String>,

    /// Directories scanned for command packages.
    #[serde(default)]
    pub plugin_paths: Vec<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            search_prefixes: default_search_prefixes(),
            plugin_paths: Vec::new(),
        }
    }
}
