//! Module resolution for external commands backed by an executable.
//!
//! A command package declares its executable in the manifest `bin` field.
//! The command accepts any trailing arguments and forwards them unchanged.

use std::path::Path;
use std::process::Command as Process;

use clap::{Arg, ArgMatches};
use plugin_commands::{CommandResult, ModuleExports, ModuleResolver, PackageManifest, RunError};

/// Id of the trailing-arguments argument every process command registers.
pub(crate) const FORWARDED_ARGS: &str = "args";

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ProcessModuleResolver;

impl ModuleResolver for ProcessModuleResolver {
    fn resolve(&self, path: &Path) -> CommandResult<ModuleExports> {
        let manifest = PackageManifest::load(path)?;

        let mut module = ModuleExports::new().register(|cmd| {
            cmd.arg(
                Arg::new(FORWARDED_ARGS)
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true)
                    .help("Arguments passed through to the command"),
            )
        });
        module.description = manifest.description;
        module.alias = manifest.alias;
        module.global = manifest.global;

        // Without `bin` there is no `run`, and the module fails validation.
        if let Some(bin) = manifest.bin {
            let program = path.join(bin);
            module = module.run(move |matches| run_process(&program, matches));
        }

        Ok(module)
    }
}

fn run_process(program: &Path, matches: &ArgMatches) -> Result<(), RunError> {
    let args: Vec<&String> = matches
        .get_many::<String>(FORWARDED_ARGS)
        .map(|values| values.collect())
        .unwrap_or_default();

    tracing::debug!(?program, ?args, "Spawning command process");
    let status = Process::new(program).args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("{} exited with {status}", program.display()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_commands::{adapt_module, CommandError, MANIFEST_FILENAME};
    use std::fs;

    #[test]
    fn test_resolve_reads_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            r#"{ "description": "Build with webpack", "bin": "run.sh", "alias": "bw", "global": true }"#,
        )
        .unwrap();

        let module = ProcessModuleResolver.resolve(dir.path()).unwrap();
        let command = adapt_module(module).unwrap();
        assert_eq!(command.description, "Build with webpack");
        assert_eq!(command.alias, vec!["bw"]);
        assert_eq!(command.global, Some(true));

        let cmd = (command.register)(clap::Command::new("webpack"));
        let matches = cmd.get_matches_from(["webpack", "--mode", "production"]);
        let forwarded: Vec<&String> = matches.get_many::<String>(FORWARDED_ARGS).unwrap().collect();
        assert_eq!(forwarded, vec!["--mode", "production"]);
    }

    #[test]
    fn test_resolve_without_bin_has_no_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            r#"{ "description": "No executable" }"#,
        )
        .unwrap();

        let module = ProcessModuleResolver.resolve(dir.path()).unwrap();
        assert_eq!(adapt_module(module).unwrap_err().missing, vec!["run"]);
    }

    #[test]
    fn test_resolve_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProcessModuleResolver.resolve(dir.path()).unwrap_err();
        assert!(matches!(err, CommandError::Manifest(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_run_process_exit_status() {
        let matches = clap::Command::new("x")
            .arg(Arg::new(FORWARDED_ARGS).num_args(0..))
            .get_matches_from(["x"]);

        assert!(run_process(Path::new("/bin/true"), &matches).is_ok());
        assert!(run_process(Path::new("/bin/false"), &matches).is_err());
    }
}
