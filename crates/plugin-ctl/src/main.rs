//! plugin-ctl
//!
//! Command-line host for plugin commands. Commands are discovered in the
//! configured plugin paths, named by the `<prefix>-<group>-<name>` convention,
//! and invoked as `plugin-ctl <group> [command] [args...]`.

mod app;
mod builtin;
mod cli_config;
mod output;
mod resolver;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("plugin_ctl=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = cli_config::load_cli_config();

    let result = app::build_registry(&config, &args)
        .and_then(|registry| app::run(&registry, &config, &args));

    if let Err(e) = result {
        output::error(format!("{e:#}"));
        std::process::exit(1);
    }

    Ok(())
}
