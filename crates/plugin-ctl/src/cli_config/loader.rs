//! Locating and reading the `plugin-ctl` config file.
//!
//! The project file `./.plugin-ctl.toml` wins over the user file
//! `~/.config/plugin-ctl.toml`. Only the first file found is read; the two are
//! never merged.

use std::path::{Path, PathBuf};

use super::CliConfig;

const CONFIG_FILENAME: &str = ".plugin-ctl.toml";
const GLOBAL_CONFIG_DIR: &str = ".config";
const GLOBAL_CONFIG_FILENAME: &str = "plugin-ctl.toml";

/// Which config file supplied the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigScope {
    Project,
    User,
}

/// Read the first config file found, falling back to defaults.
///
/// A file that cannot be read or parsed is ignored with a warning. The user
/// file is not consulted in that case.
pub(crate) fn load_cli_config() -> CliConfig {
    let Some((scope, path)) = config_candidates()
        .into_iter()
        .find(|(_, path)| path.is_file())
    else {
        tracing::debug!("No plugin-ctl config file, using default search prefix");
        return CliConfig::default();
    };

    match read_config(&path) {
        Ok(config) => {
            tracing::debug!(
                ?scope,
                ?path,
                prefixes = ?config.search_prefixes,
                plugin_paths = config.plugin_paths.len(),
                "Loaded plugin-ctl config"
            );
            config
        }
        Err(reason) => {
            tracing::warn!(
                ?path,
                "Ignoring plugin-ctl config ({reason}); no plugin paths will be scanned"
            );
            CliConfig::default()
        }
    }
}

fn config_candidates() -> Vec<(ConfigScope, PathBuf)> {
    let mut candidates = vec![(ConfigScope::Project, PathBuf::from(CONFIG_FILENAME))];
    if let Some(home) = home_dir() {
        candidates.push((
            ConfigScope::User,
            home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME),
        ));
    }
    candidates
}

fn read_config(path: &Path) -> Result<CliConfig, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| format!("unreadable: {e}"))?;
    toml::from_str(&contents).map_err(|e| format!("invalid TOML: {e}"))
}

/// Resolve a configured plugin path. A leading `~` stands for `$HOME`.
pub(crate) fn expand_path(path: &str) -> PathBuf {
    let home_relative = match path {
        "~" => Some(""),
        _ => path.strip_prefix("~/"),
    };
    match (home_relative, home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli_config::DEFAULT_SEARCH_PREFIX;
    use serial_test::serial;

    struct HomeGuard(Option<String>);

    impl HomeGuard {
        fn set(home: &std::path::Path) -> Self {
            let previous = std::env::var("HOME").ok();
            std::env::set_var("HOME", home);
            Self(previous)
        }
    }

    impl Drop for HomeGuard {
        fn drop(&mut self) {
            match &self.0 {
                Some(home) => std::env::set_var("HOME", home),
                None => std::env::remove_var("HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_expand_path_tilde() {
        let home = tempfile::tempdir().unwrap();
        let _guard = HomeGuard::set(home.path());

        let expanded = expand_path("~/node_modules");
        assert_eq!(expanded, home.path().join("node_modules"));
    }

    #[test]
    #[serial]
    fn test_expand_bare_tilde() {
        let home = tempfile::tempdir().unwrap();
        let _guard = HomeGuard::set(home.path());

        assert_eq!(expand_path("~"), home.path());
        assert_eq!(expand_path("~plugins"), PathBuf::from("~plugins"));
    }

    #[test]
    fn test_config_candidates_project_first() {
        let candidates = config_candidates();
        assert_eq!(
            candidates[0],
            (ConfigScope::Project, PathBuf::from(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_expand_path_absolute() {
        let expanded = expand_path("/usr/local/lib/node_modules");
        assert_eq!(expanded, PathBuf::from("/usr/local/lib/node_modules"));
    }

    #[test]
    fn test_expand_path_relative() {
        let expanded = expand_path("./node_modules");
        assert_eq!(expanded, PathBuf::from("./node_modules"));
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.search_prefixes, vec![DEFAULT_SEARCH_PREFIX]);
        assert!(config.plugin_paths.is_empty());
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
search-prefixes = ["@scope/cli", "foo-cli"]
plugin-paths = ["./node_modules", "~/.plugin-ctl/commands"]
"#;
        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search_prefixes, vec!["@scope/cli", "foo-cli"]);
        assert_eq!(
            config.plugin_paths,
            vec!["./node_modules", "~/.plugin-ctl/commands"]
        );
    }

    #[test]
    fn test_parse_minimal_config_keeps_default_prefix() {
        let config: CliConfig = toml::from_str(r#"plugin-paths = ["./plugins"]"#).unwrap();
        assert_eq!(config.plugin_paths.len(), 1);
        assert_eq!(config.search_prefixes, vec![DEFAULT_SEARCH_PREFIX]);
    }

    #[test]
    #[serial]
    fn test_load_global_config() {
        let home = tempfile::tempdir().unwrap();
        let config_dir = home.path().join(GLOBAL_CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join(GLOBAL_CONFIG_FILENAME),
            "search-prefixes = [\"global-cli\"]\n",
        )
        .unwrap();
        let _guard = HomeGuard::set(home.path());

        // A project-local config in the test working directory would win.
        if !PathBuf::from(CONFIG_FILENAME).is_file() {
            let config = load_cli_config();
            assert_eq!(config.search_prefixes, vec!["global-cli"]);
        }
    }

    #[test]
    #[serial]
    fn test_load_invalid_config_returns_defaults() {
        let home = tempfile::tempdir().unwrap();
        let config_dir = home.path().join(GLOBAL_CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join(GLOBAL_CONFIG_FILENAME), "search-prefixes = 7").unwrap();
        let _guard = HomeGuard::set(home.path());

        if !PathBuf::from(CONFIG_FILENAME).is_file() {
            let config = load_cli_config();
            assert_eq!(config.search_prefixes, vec![DEFAULT_SEARCH_PREFIX]);
        }
    }
}
