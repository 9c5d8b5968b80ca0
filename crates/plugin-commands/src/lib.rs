//! # plugin-commands
//!
//! Loads plugin commands for a command-line host and indexes them by group
//! and name.
//!
//! External commands live in directories named `<prefix>-<group>-<name>`
//! next to a `package.json` manifest. A [`ModuleResolver`] turns such a path
//! into [`ModuleExports`]; [`adapt_module`] checks that the exports provide a
//! description, a `register` hook and a `run` hook; the loader derives group
//! and name from the path and produces a [`CommandWrapper`]. Wrappers are
//! collected in a [`GroupMap`] and retrieved with [`get_command`].
//!
//! When the host is only rendering help, [`ExternalCommandLoader`] reads the
//! manifest description and never resolves the module itself.

pub mod command;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod module;
pub mod naming;
pub mod registry;

pub use command::{Command, CommandWrapper, EjectFn, RegisterFn, RunFn, ValidateFn};
pub use discovery::discover_command_dirs;
pub use error::{CommandError, CommandResult, RunError};
pub use loader::{
    is_light_load, BuiltInCommandLoader, CommandLoader, ExternalCommandLoader, ModuleResolver,
    StaticModuleResolver, HELP_FLAGS,
};
pub use manifest::{ManifestError, PackageManifest, MANIFEST_FILENAME};
pub use module::{adapt_module, Alias, InterfaceError, ModuleExports};
pub use naming::{command_pattern, resolve_command_name, resolve_with, CommandName};
pub use registry::{get_command, CommandMap, GroupMap};
