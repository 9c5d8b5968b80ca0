//! Registry assembly, help listing and dispatch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Arg, ArgMatches};
use plugin_commands::{
    discover_command_dirs, get_command, is_light_load, BuiltInCommandLoader, CommandError,
    CommandLoader, CommandWrapper, ExternalCommandLoader, GroupMap,
};

use crate::builtin::{builtin_resolver, BUILTIN_PATHS};
use crate::cli_config::{expand_path, CliConfig};
use crate::output;
use crate::resolver::ProcessModuleResolver;

const BIN_NAME: &str = "plugin-ctl";

/// Subcommand that runs a command's eject capability.
const EJECT: &str = "eject";

/// Names clap or `plugin-ctl` already use at the top level of the tree.
const RESERVED_GROUPS: [&str; 2] = ["help", EJECT];

/// Name clap already uses inside every group.
const RESERVED_COMMAND: &str = "help";

/// Load built-in and discovered external commands into a registry.
///
/// Commands that fail to load, or whose names collide with names already in
/// use, are logged and skipped.
pub(crate) fn build_registry(config: &CliConfig, args: &[String]) -> anyhow::Result<GroupMap> {
    let mut registry = GroupMap::new();

    let builtin_loader = BuiltInCommandLoader::new(Arc::new(builtin_resolver(config)));
    for path in BUILTIN_PATHS {
        register(&mut registry, &builtin_loader, Path::new(path));
    }

    let external_loader =
        ExternalCommandLoader::new(&config.search_prefixes, Arc::new(ProcessModuleResolver))
            .context("Invalid search-prefixes configuration")?
            .for_invocation(args);

    let search_paths: Vec<PathBuf> = config.plugin_paths.iter().map(|p| expand_path(p)).collect();
    for dir in discover_command_dirs(&search_paths, external_loader.pattern()) {
        register(&mut registry, &external_loader, &dir);
    }

    Ok(registry)
}

fn register(registry: &mut GroupMap, loader: &dyn CommandLoader, path: &Path) {
    let wrapper = match loader.load(path) {
        Ok(wrapper) => wrapper,
        Err(e) => {
            tracing::warn!(?path, error = %e, "Skipping command: failed to load");
            return;
        }
    };

    match check_names(registry, &wrapper) {
        Ok(()) => registry.insert(wrapper),
        Err(reason) => {
            tracing::warn!(
                ?path,
                group = %wrapper.group,
                name = %wrapper.name,
                "Skipping command: {reason}"
            );
        }
    }
}

/// Check that `wrapper` can join the clap tree without clashing with a
/// reserved name or a sibling's name or alias.
///
/// A command replacing a sibling of the same name is checked against the
/// other siblings only.
fn check_names(registry: &GroupMap, wrapper: &CommandWrapper) -> Result<(), String> {
    if wrapper.group.is_empty() || wrapper.name.is_empty() {
        return Err("no group or name".to_string());
    }
    if RESERVED_GROUPS.contains(&wrapper.group.as_str()) {
        return Err(format!("group name '{}' is reserved", wrapper.group));
    }

    let mut names = HashSet::new();
    for name in std::iter::once(&wrapper.name).chain(&wrapper.alias) {
        if name == RESERVED_COMMAND {
            return Err(format!("command name '{name}' is reserved"));
        }
        if !names.insert(name.as_str()) {
            return Err(format!("'{name}' is given more than once"));
        }
    }

    let Some(siblings) = registry.group(&wrapper.group) else {
        return Ok(());
    };
    for sibling in siblings.iter().filter(|s| s.name != wrapper.name) {
        let taken = std::iter::once(&sibling.name)
            .chain(&sibling.alias)
            .find(|name| names.contains(name.as_str()));
        if let Some(taken) = taken {
            return Err(format!("'{taken}' is already used by '{}'", sibling.name));
        }
    }
    Ok(())
}

/// Print the help listing for a light-load invocation, or parse `args` and
/// run the selected command.
pub(crate) fn run(registry: &GroupMap, config: &CliConfig, args: &[String]) -> anyhow::Result<()> {
    if is_light_load(args) {
        print_listing(registry, config);
        return Ok(());
    }

    let argv = std::iter::once(BIN_NAME.to_string()).chain(args.iter().cloned());
    let matches = cli(registry).get_matches_from(argv);

    if let Some((EJECT, eject_matches)) = matches.subcommand() {
        return eject(registry, eject_matches);
    }

    let (wrapper, command_matches) = select(registry, &matches)?;

    tracing::debug!(group = %wrapper.group, name = %wrapper.name, "Running command");
    wrapper
        .run_with(command_matches)
        .map_err(|e| anyhow!("{} {} failed: {e}", wrapper.group, wrapper.name))
}

/// Build the clap command tree from the registry.
pub(crate) fn cli(registry: &GroupMap) -> clap::Command {
    let mut cli = clap::Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Discover and run plugin commands")
        .styles(output::clap_styles())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(eject_command());

    for (group, commands) in registry.groups() {
        let mut group_cmd = clap::Command::new(group.to_string())
            .about(format!("{group} commands"))
            .args_conflicts_with_subcommands(true);

        // Group invoked without a command name runs the default command.
        if let Some(default) = commands.default_command() {
            group_cmd = default.register_with(group_cmd);
        }

        for wrapper in commands.iter() {
            group_cmd = group_cmd.subcommand(command_for(wrapper));
        }
        cli = cli.subcommand(group_cmd);
    }

    cli
}

fn command_for(wrapper: &CommandWrapper) -> clap::Command {
    let cmd = clap::Command::new(wrapper.name.clone())
        .about(wrapper.description.clone())
        .visible_aliases(wrapper.alias.clone());
    wrapper.register_with(cmd)
}

fn eject_command() -> clap::Command {
    clap::Command::new(EJECT)
        .about("Eject a command's bundled configuration into the project")
        .arg(Arg::new("group").required(true).help("Command group"))
        .arg(Arg::new("command").help("Command name (defaults to the group default)"))
}

/// Resolve parsed arguments to the command to run and its matches.
pub(crate) fn select<'a>(
    registry: &'a GroupMap,
    matches: &'a ArgMatches,
) -> anyhow::Result<(&'a CommandWrapper, &'a ArgMatches)> {
    let (group, group_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("No command group given"))?;

    let (command_name, command_matches) = match group_matches.subcommand() {
        Some((name, sub_matches)) => (Some(name), sub_matches),
        None => (None, group_matches),
    };

    Ok((lookup(registry, group, command_name)?, command_matches))
}

fn lookup<'a>(
    registry: &'a GroupMap,
    group: &str,
    command_name: Option<&str>,
) -> anyhow::Result<&'a CommandWrapper> {
    get_command(registry, group, command_name)
        .map_err(with_listing_hint)?
        .ok_or_else(|| anyhow!("Group '{group}' has no default command; name one explicitly"))
}

fn with_listing_hint(e: CommandError) -> anyhow::Error {
    if e.is_lookup_error() {
        anyhow!("{e} (run `{BIN_NAME} --help` to list commands)")
    } else {
        e.into()
    }
}

fn eject(registry: &GroupMap, matches: &ArgMatches) -> anyhow::Result<()> {
    let group = matches
        .get_one::<String>("group")
        .ok_or_else(|| anyhow!("No command group given"))?;
    let command_name = matches.get_one::<String>("command").map(String::as_str);
    let wrapper = lookup(registry, group, command_name)?;

    tracing::debug!(group = %wrapper.group, name = %wrapper.name, "Ejecting command");
    let ejected = wrapper
        .eject_with(matches)
        .map_err(|e| anyhow!("{} {} eject failed: {e}", wrapper.group, wrapper.name))?;

    if ejected {
        output::hint(format!("Ejected {} {}", wrapper.group, wrapper.name));
    } else {
        output::warning(format!(
            "{} {} has nothing to eject",
            wrapper.group, wrapper.name
        ));
    }
    Ok(())
}
