//! Raw module exports and the command interface check.
//!
//! A [`ModuleResolver`](crate::loader::ModuleResolver) hands back whatever a
//! plugin exported as a [`ModuleExports`]. Every field is optional; only
//! [`adapt_module`] decides whether the shape is a usable [`Command`].

use std::fmt;
use std::sync::Arc;

use clap::ArgMatches;
use serde::Deserialize;

use crate::command::{
    noop_eject, noop_register, noop_run, noop_validate, Command, EjectFn, RegisterFn, RunFn,
    ValidateFn,
};
use crate::error::RunError;

/// Command aliases as a module declares them: a single alias or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Alias {
    One(String),
    Many(Vec<String>),
}

impl Alias {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Alias::One(alias) => vec![alias],
            Alias::Many(aliases) => aliases,
        }
    }
}

impl From<&str> for Alias {
    fn from(alias: &str) -> Self {
        Alias::One(alias.to_string())
    }
}

impl From<Vec<String>> for Alias {
    fn from(aliases: Vec<String>) -> Self {
        Alias::Many(aliases)
    }
}

/// Everything a plugin module exported, before validation.
///
/// `es_module` together with `default_export` models a module whose real
/// exports sit behind a default-export wrapper.
#[derive(Clone, Default)]
pub struct ModuleExports {
    pub es_module: bool,
    pub default_export: Option<Box<ModuleExports>>,
    pub description: Option<String>,
    pub register: Option<RegisterFn>,
    pub run: Option<RunFn>,
    pub alias: Option<Alias>,
    pub eject: Option<EjectFn>,
    pub global: Option<bool>,
    pub validate: Option<ValidateFn>,
    pub name: Option<String>,
    pub group: Option<String>,
}

impl ModuleExports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `inner` as the default export of an otherwise empty module.
    pub fn with_default_export(inner: ModuleExports) -> Self {
        Self {
            es_module: true,
            default_export: Some(Box::new(inner)),
            ..Self::default()
        }
    }

    /// Stand-in module used for help listings: only the description is real,
    /// every capability is a no-op.
    pub fn inert(description: Option<String>) -> Self {
        Self {
            description,
            register: Some(noop_register()),
            run: Some(noop_run()),
            alias: Some(Alias::Many(Vec::new())),
            eject: Some(noop_eject()),
            global: Some(false),
            validate: Some(noop_validate()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn register<F>(mut self, register: F) -> Self
    where
        F: Fn(clap::Command) -> clap::Command + Send + Sync + 'static,
    {
        self.register = Some(Arc::new(register));
        self
    }

    pub fn run<F>(mut self, run: F) -> Self
    where
        F: Fn(&ArgMatches) -> Result<(), RunError> + Send + Sync + 'static,
    {
        self.run = Some(Arc::new(run));
        self
    }

    pub fn alias(mut self, alias: impl Into<Alias>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn eject<F>(mut self, eject: F) -> Self
    where
        F: Fn(&ArgMatches) -> Result<(), RunError> + Send + Sync + 'static,
    {
        self.eject = Some(Arc::new(eject));
        self
    }

    pub fn global(mut self, global: bool) -> Self {
        self.global = Some(global);
        self
    }

    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&ArgMatches) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    fn unwrap_default_export(mut self) -> Self {
        if self.es_module {
            if let Some(inner) = self.default_export.take() {
                return *inner;
            }
        }
        self
    }
}

impl fmt::Debug for ModuleExports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleExports")
            .field("es_module", &self.es_module)
            .field("default_export", &self.default_export)
            .field("description", &self.description)
            .field("register", &self.register.is_some())
            .field("run", &self.run.is_some())
            .field("alias", &self.alias)
            .field("global", &self.global)
            .field("name", &self.name)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// A module lacked one or more required capabilities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Module does not satisfy the Command interface (missing: {})", .missing.join(", "))]
pub struct InterfaceError {
    pub missing: Vec<&'static str>,
}

/// Check `module` against the command interface.
///
/// Default-export wrappers are unwrapped first. The module passes when it has
/// a non-empty `description`, a `register` and a `run`; the returned command
/// carries those values unchanged.
pub fn adapt_module(module: ModuleExports) -> Result<Command, InterfaceError> {
    let module = module.unwrap_default_export();
    let description = module.description.filter(|d| !d.is_empty());

    match (description, module.register, module.run) {
        (Some(description), Some(register), Some(run)) => Ok(Command {
            description,
            register,
            run,
            alias: module.alias.map(Alias::into_vec).unwrap_or_default(),
            eject: module.eject,
            global: module.global,
            validate: module.validate,
            name: module.name,
            group: module.group,
        }),
        (description, register, run) => {
            let missing = [
                ("description", description.is_none()),
                ("register", register.is_none()),
                ("run", run.is_none()),
            ]
            .into_iter()
            .filter_map(|(field, absent)| absent.then_some(field))
            .collect();
            Err(InterfaceError { missing })
        }
    }
}
