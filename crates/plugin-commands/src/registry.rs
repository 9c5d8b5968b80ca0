//! Command registry: commands indexed by group, then by name.

use std::collections::BTreeMap;

use crate::command::CommandWrapper;
use crate::error::{CommandError, CommandResult};

/// Commands of one group, kept in insertion order.
#[derive(Debug, Default, Clone)]
pub struct CommandMap {
    commands: Vec<CommandWrapper>,
}

impl CommandMap {
    pub fn get(&self, name: &str) -> Option<&CommandWrapper> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// Insert `wrapper`, replacing any command with the same name in place.
    /// Returns the replaced command.
    pub fn insert(&mut self, wrapper: CommandWrapper) -> Option<CommandWrapper> {
        match self.commands.iter_mut().find(|c| c.name == wrapper.name) {
            Some(existing) => Some(std::mem::replace(existing, wrapper)),
            None => {
                self.commands.push(wrapper);
                None
            }
        }
    }

    /// First command flagged as the group default.
    pub fn default_command(&self) -> Option<&CommandWrapper> {
        self.commands.iter().find(|command| command.is_default)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandWrapper> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Two-level registry: group name to [`CommandMap`].
#[derive(Debug, Default, Clone)]
pub struct GroupMap {
    groups: BTreeMap<String, CommandMap>,
}

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its group and name.
    ///
    /// The first command registered in a group becomes the group default. A
    /// command replacing one of the same name keeps that command's default flag.
    pub fn insert(&mut self, mut wrapper: CommandWrapper) {
        let is_new_group = !self.groups.contains_key(&wrapper.group);
        let commands = self.groups.entry(wrapper.group.clone()).or_default();

        if is_new_group {
            wrapper.is_default = true;
        } else if let Some(existing) = commands.get(&wrapper.name) {
            wrapper.is_default = existing.is_default;
        }

        tracing::debug!(
            group = %wrapper.group,
            name = %wrapper.name,
            is_default = wrapper.is_default,
            "Registered command"
        );
        if let Some(replaced) = commands.insert(wrapper) {
            tracing::debug!(path = ?replaced.path, "Replaced previously registered command");
        }
    }

    pub fn group(&self, group: &str) -> Option<&CommandMap> {
        self.groups.get(group)
    }

    /// Groups sorted by name.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &CommandMap)> {
        self.groups.iter().map(|(name, commands)| (name.as_str(), commands))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<CommandWrapper> for GroupMap {
    fn from_iter<I: IntoIterator<Item = CommandWrapper>>(iter: I) -> Self {
        let mut map = GroupMap::new();
        for wrapper in iter {
            map.insert(wrapper);
        }
        map
    }
}

/// Look up a command.
///
/// With a command name, a missing command is an error. Without one, the
/// group's default command is returned, and `Ok(None)` means the group has no
/// default; callers must handle that separately from the error cases.
pub fn get_command<'a>(
    group_map: &'a GroupMap,
    group_name: &str,
    command_name: Option<&str>,
) -> CommandResult<Option<&'a CommandWrapper>> {
    let commands = group_map
        .group(group_name)
        .ok_or_else(|| CommandError::GroupNotFound {
            group: group_name.to_string(),
        })?;

    match command_name {
        Some(command_name) => commands
            .get(command_name)
            .map(Some)
            .ok_or_else(|| CommandError::CommandNotFound {
                group: group_name.to_string(),
                command: command_name.to_string(),
            }),
        None => Ok(commands.default_command()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{BuiltInCommandLoader, CommandLoader, StaticModuleResolver};
    use crate::module::ModuleExports;
    use std::path::Path;
    use std::sync::Arc;

    fn wrapper(group: &str, name: &str) -> CommandWrapper {
        let path = format!("builtin/{group}-{name}");
        let mut resolver = StaticModuleResolver::new();
        resolver.insert(
            path.as_str(),
            ModuleExports::new()
                .description(format!("{group} {name}"))
                .register(|cmd| cmd)
                .run(|_| Ok(()))
                .group(group)
                .name(name),
        );
        BuiltInCommandLoader::new(Arc::new(resolver))
            .load(Path::new(&path))
            .unwrap()
    }

    #[test]
    fn test_get_named_command() {
        let map: GroupMap = [wrapper("build", "webpack")].into_iter().collect();

        let found = get_command(&map, "build", Some("webpack")).unwrap().unwrap();
        assert_eq!(found.name, "webpack");
        assert_eq!(found.group, "build");
    }

    #[test]
    fn test_group_not_found() {
        let map: GroupMap = [wrapper("build", "webpack")].into_iter().collect();

        let err = get_command(&map, "serve", None).unwrap_err();
        assert!(matches!(err, CommandError::GroupNotFound { ref group } if group == "serve"));
        assert!(err.to_string().contains("serve"));
    }

    #[test]
    fn test_command_not_found() {
        let map: GroupMap = [wrapper("build", "webpack")].into_iter().collect();

        let err = get_command(&map, "build", Some("rollup")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::CommandNotFound { ref group, ref command }
                if group == "build" && command == "rollup"
        ));
    }

    #[test]
    fn test_default_command_is_first_in_group() {
        let map: GroupMap = [
            wrapper("build", "webpack"),
            wrapper("build", "rollup"),
            wrapper("serve", "dist"),
        ]
        .into_iter()
        .collect();

        let default = get_command(&map, "build", None).unwrap().unwrap();
        assert_eq!(default.name, "webpack");
        assert!(!map.group("build").unwrap().get("rollup").unwrap().is_default);
        assert_eq!(
            get_command(&map, "serve", None).unwrap().unwrap().name,
            "dist"
        );
    }

    #[test]
    fn test_no_default_returns_none() {
        let mut map = GroupMap::new();
        map.insert(wrapper("build", "webpack"));
        // Clear the default through a direct command map edit.
        let mut commands = map.group("build").unwrap().clone();
        let mut webpack = commands.get("webpack").unwrap().clone();
        webpack.is_default = false;
        commands.insert(webpack);
        map.groups.insert("build".into(), commands);

        assert!(get_command(&map, "build", None).unwrap().is_none());
    }

    #[test]
    fn test_replacement_keeps_default_flag_and_position() {
        let mut map = GroupMap::new();
        map.insert(wrapper("build", "webpack"));
        map.insert(wrapper("build", "rollup"));

        let mut replacement = wrapper("build", "webpack");
        replacement.description = "Replacement".into();
        map.insert(replacement);

        let build = map.group("build").unwrap();
        assert_eq!(build.len(), 2);
        let names: Vec<&str> = build.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["webpack", "rollup"]);
        let default = build.default_command().unwrap();
        assert_eq!(default.description, "Replacement");
    }

    #[test]
    fn test_groups_sorted() {
        let map: GroupMap = [
            wrapper("serve", "dist"),
            wrapper("build", "webpack"),
            wrapper("create", "app"),
        ]
        .into_iter()
        .collect();

        let groups: Vec<&str> = map.groups().map(|(name, _)| name).collect();
        assert_eq!(groups, vec!["build", "create", "serve"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_empty_registry() {
        let map = GroupMap::new();
        assert!(map.is_empty());
        assert!(matches!(
            get_command(&map, "build", Some("webpack")),
            Err(CommandError::GroupNotFound { .. })
        ));
    }
}
