//! Command loaders.
//!
//! [`ExternalCommandLoader`] loads plugin commands named by the
//! `<prefix>-<group>-<name>` convention. [`BuiltInCommandLoader`] loads
//! commands shipped with the host, which declare their own group and name.
//! Both validate through [`adapt_module`] and refuse malformed modules.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;

use crate::command::CommandWrapper;
use crate::error::{CommandError, CommandResult};
use crate::manifest::PackageManifest;
use crate::module::{adapt_module, ModuleExports};
use crate::naming::{command_pattern, resolve_with, CommandName};

/// Arguments that, given alone, only ask for help.
pub const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

/// Group and name of the scaffolding command that is always global.
const FORCED_GLOBAL: (&str, &str) = ("create", "app");

/// Whether an invocation only needs command metadata.
///
/// `args` excludes the program name. True for no arguments or a single help
/// flag, in which case loaders skip importing command modules.
pub fn is_light_load<S: AsRef<str>>(args: &[S]) -> bool {
    match args {
        [] => true,
        [only] => HELP_FLAGS.contains(&only.as_ref()),
        _ => false,
    }
}

/// Turns a command path into module exports.
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, path: &Path) -> CommandResult<ModuleExports>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&Path) -> CommandResult<ModuleExports> + Send + Sync,
{
    fn resolve(&self, path: &Path) -> CommandResult<ModuleExports> {
        self(path)
    }
}

/// Resolver over modules registered in-process, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct StaticModuleResolver {
    modules: HashMap<PathBuf, ModuleExports>,
}

impl StaticModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, module: ModuleExports) -> &mut Self {
        self.modules.insert(path.into(), module);
        self
    }
}

impl ModuleResolver for StaticModuleResolver {
    fn resolve(&self, path: &Path) -> CommandResult<ModuleExports> {
        self.modules
            .get(path)
            .cloned()
            .ok_or_else(|| CommandError::module_resolution(path, "no module registered at path"))
    }
}

/// Loads a command from a path.
pub trait CommandLoader {
    fn load(&self, path: &Path) -> CommandResult<CommandWrapper>;
}

/// Loader for external commands named by their path.
pub struct ExternalCommandLoader {
    pattern: Regex,
    resolver: Arc<dyn ModuleResolver>,
    light_load: bool,
}

impl ExternalCommandLoader {
    /// Create a loader that fully loads every command.
    pub fn new<S: AsRef<str>>(
        search_prefixes: &[S],
        resolver: Arc<dyn ModuleResolver>,
    ) -> CommandResult<Self> {
        Ok(Self {
            pattern: command_pattern(search_prefixes)?,
            resolver,
            light_load: false,
        })
    }

    /// Pick light or full loading from the invocation arguments.
    pub fn for_invocation<S: AsRef<str>>(self, args: &[S]) -> Self {
        self.with_light_load(is_light_load(args))
    }

    pub fn with_light_load(mut self, light_load: bool) -> Self {
        self.light_load = light_load;
        self
    }

    pub fn is_light_load(&self) -> bool {
        self.light_load
    }

    /// Naming pattern built from the configured search prefixes.
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    fn read_module(&self, path: &Path) -> CommandResult<ModuleExports> {
        if self.light_load {
            tracing::debug!(?path, "Light load: reading manifest only");
            let manifest = PackageManifest::load(path)?;
            Ok(ModuleExports::inert(manifest.description))
        } else {
            tracing::debug!(?path, "Full load: resolving module");
            self.resolver.resolve(path)
        }
    }
}

impl CommandLoader for ExternalCommandLoader {
    fn load(&self, path: &Path) -> CommandResult<CommandWrapper> {
        let module = self.read_module(path)?;
        let command = adapt_module(module).map_err(|source| CommandError::InvalidCommandModule {
            path: path.to_path_buf(),
            source,
        })?;

        let CommandName { group, name } = resolve_with(&self.pattern, path)?;
        let global = (group.as_str(), name.as_str()) == FORCED_GLOBAL
            || command.global.unwrap_or(false);

        tracing::debug!(%group, %name, ?path, "Loaded external command");
        Ok(CommandWrapper::from_command(command, group, name, global, path))
    }
}

impl fmt::Debug for ExternalCommandLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalCommandLoader")
            .field("pattern", &self.pattern.as_str())
            .field("light_load", &self.light_load)
            .finish_non_exhaustive()
    }
}

/// Loader for commands bundled with the host.
pub struct BuiltInCommandLoader {
    resolver: Arc<dyn ModuleResolver>,
}

impl BuiltInCommandLoader {
    pub fn new(resolver: Arc<dyn ModuleResolver>) -> Self {
        Self { resolver }
    }
}

impl CommandLoader for BuiltInCommandLoader {
    fn load(&self, path: &Path) -> CommandResult<CommandWrapper> {
        let module = self.resolver.resolve(path)?;
        let mut command =
            adapt_module(module).map_err(|source| CommandError::InvalidCommandModule {
                path: path.to_path_buf(),
                source,
            })?;

        let group = command.group.take().unwrap_or_default();
        let name = command.name.take().unwrap_or_default();
        let global = command.global.unwrap_or(false);

        tracing::debug!(%group, %name, ?path, "Loaded built-in command");
        Ok(CommandWrapper::from_command(command, group, name, global, path))
    }
}

impl fmt::Debug for BuiltInCommandLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltInCommandLoader").finish_non_exhaustive()
    }
}
