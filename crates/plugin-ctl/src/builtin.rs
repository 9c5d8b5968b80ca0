//! Commands shipped with `plugin-ctl` itself.

use std::path::PathBuf;

use plugin_commands::{ModuleExports, StaticModuleResolver};

use crate::cli_config::{expand_path, CliConfig};
use crate::output;

/// Load paths of the built-in commands, in registration order.
pub(crate) const BUILTIN_PATHS: [&str; 2] = ["builtin/config-show", "builtin/config-paths"];

/// Resolver holding every built-in command module.
pub(crate) fn builtin_resolver(config: &CliConfig) -> StaticModuleResolver {
    let mut resolver = StaticModuleResolver::new();
    resolver
        .insert(BUILTIN_PATHS[0], config_show(config.clone()))
        .insert(BUILTIN_PATHS[1], config_paths(config.clone()));
    resolver
}

fn config_show(config: CliConfig) -> ModuleExports {
    ModuleExports::new()
        .group("config")
        .name("show")
        .description("Show the effective plugin-ctl configuration")
        .register(|cmd| cmd)
        .run(move |_| {
            output::header("Configuration:");
            output::label("Search prefixes", config.search_prefixes.join(", "));
            if config.plugin_paths.is_empty() {
                output::label("Plugin paths", "(none)");
            } else {
                output::label("Plugin paths", config.plugin_paths.join(", "));
            }
            Ok(())
        })
}

fn config_paths(config: CliConfig) -> ModuleExports {
    ModuleExports::new()
        .group("config")
        .name("paths")
        .alias("ls")
        .description("Check which configured plugin paths exist")
        .register(|cmd| cmd)
        .run(move |_| {
            let paths: Vec<PathBuf> = config.plugin_paths.iter().map(|p| expand_path(p)).collect();
            if paths.is_empty() {
                output::warning("No plugin paths configured.");
                return Ok(());
            }
            for path in paths {
                output::status_icon(path.is_dir(), path.display());
            }
            Ok(())
        })
}
