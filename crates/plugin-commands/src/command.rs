//! Validated command records.
//!
//! A [`Command`] is what remains of a raw module once it has passed the
//! interface check in [`crate::module`]. A [`CommandWrapper`] is a command
//! joined with its group, name and load path, ready to be stored in a
//! [`GroupMap`](crate::registry::GroupMap).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::ArgMatches;

use crate::error::RunError;

/// Declares a command's options on the clap command it will be parsed with.
pub type RegisterFn = Arc<dyn Fn(clap::Command) -> clap::Command + Send + Sync>;

/// Executes a command with its parsed arguments.
pub type RunFn = Arc<dyn Fn(&ArgMatches) -> Result<(), RunError> + Send + Sync>;

/// Copies a command's managed configuration into the host project.
pub type EjectFn = Arc<dyn Fn(&ArgMatches) -> Result<(), RunError> + Send + Sync>;

/// Checks parsed arguments before `run` is invoked.
pub type ValidateFn = Arc<dyn Fn(&ArgMatches) -> bool + Send + Sync>;

pub(crate) fn noop_register() -> RegisterFn {
    Arc::new(|command| command)
}

pub(crate) fn noop_run() -> RunFn {
    Arc::new(|_| Ok(()))
}

pub(crate) fn noop_eject() -> EjectFn {
    Arc::new(|_| Ok(()))
}

pub(crate) fn noop_validate() -> ValidateFn {
    Arc::new(|_| true)
}

/// A module that satisfied the command interface.
///
/// `description`, `register` and `run` are always present. `name` and
/// `group` are only meaningful for built-in commands, which name themselves.
#[derive(Clone)]
pub struct Command {
    pub description: String,
    pub register: RegisterFn,
    pub run: RunFn,
    pub alias: Vec<String>,
    pub eject: Option<EjectFn>,
    pub global: Option<bool>,
    pub validate: Option<ValidateFn>,
    pub name: Option<String>,
    pub group: Option<String>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("description", &self.description)
            .field("alias", &self.alias)
            .field("eject", &self.eject.is_some())
            .field("global", &self.global)
            .field("validate", &self.validate.is_some())
            .field("name", &self.name)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// A loaded command indexed by group and name.
#[derive(Clone)]
pub struct CommandWrapper {
    pub name: String,
    pub group: String,
    pub alias: Vec<String>,
    pub description: String,
    pub register: RegisterFn,
    pub run: RunFn,
    pub eject: Option<EjectFn>,
    pub validate: Option<ValidateFn>,
    /// Always `true` for wrappers produced by a loader.
    pub installed: bool,
    pub global: bool,
    /// Path the command was loaded from.
    pub path: PathBuf,
    /// Marks the command run when its group is invoked without a command name.
    pub is_default: bool,
}

impl CommandWrapper {
    pub(crate) fn from_command(
        command: Command,
        group: String,
        name: String,
        global: bool,
        path: &Path,
    ) -> Self {
        Self {
            name,
            group,
            alias: command.alias,
            description: command.description,
            register: command.register,
            run: command.run,
            eject: command.eject,
            validate: command.validate,
            installed: true,
            global,
            path: path.to_path_buf(),
            is_default: false,
        }
    }

    /// Apply this command's option declarations to `command`.
    pub fn register_with(&self, command: clap::Command) -> clap::Command {
        (self.register)(command)
    }

    /// Validate `matches` (commands without a validator accept everything)
    /// and then run the command.
    pub fn run_with(&self, matches: &ArgMatches) -> Result<(), RunError> {
        if !self.validate_with(matches) {
            tracing::debug!(group = %self.group, name = %self.name, "Command validation rejected arguments");
            return Err(format!("validation failed for {} {}", self.group, self.name).into());
        }
        (self.run)(matches)
    }

    pub fn validate_with(&self, matches: &ArgMatches) -> bool {
        self.validate.as_ref().is_none_or(|validate| validate(matches))
    }

    /// Run the eject capability. Returns `Ok(false)` if the command has none.
    pub fn eject_with(&self, matches: &ArgMatches) -> Result<bool, RunError> {
        match &self.eject {
            Some(eject) => eject(matches).map(|()| true),
            None => Ok(false),
        }
    }
}

impl fmt::Debug for CommandWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandWrapper")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("alias", &self.alias)
            .field("description", &self.description)
            .field("installed", &self.installed)
            .field("global", &self.global)
            .field("path", &self.path)
            .field("is_default", &self.is_default)
            .finish_non_exhaustive()
    }
}
