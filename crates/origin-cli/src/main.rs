//! Origin CLI - Command-line interface for the content anchor registry.

use clap::Parser;
use origin_cli::commands;
use origin_cli::{Cli, CliError, Command, Config, Formatter};
use std::path::PathBuf;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> origin_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load or create config
    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::path()?,
    };
    let mut config = Config::load_or_create(&config_path)?;

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let output = match cli.command {
        Command::Profile(args) => {
            commands::execute_profile(args, &mut config, &config_path, &formatter)?
        }
        cmd => {
            // Commands that open the registry
            let profile = config.get_active_profile().ok();
            let database = cli
                .database
                .or_else(|| profile.map(|p| p.database_path.clone()))
                .ok_or_else(|| {
                    CliError::Config("No database configured; pass --database or set a profile".into())
                })?;
            let creator = profile.and_then(|p| p.creator.as_deref());
            let registry = commands::open_registry(&database)?;

            match cmd {
                Command::Anchor(args) => {
                    commands::execute_anchor(args, &registry, creator, &formatter)?
                }
                Command::Derive(args) => {
                    commands::execute_derive(args, &registry, creator, &formatter)?
                }
                Command::Verify(args) => commands::execute_verify(args, &registry, &formatter)?,
                Command::ShowLineage(args) => {
                    commands::execute_show_lineage(args, &registry, &formatter)?
                }
                Command::List(args) => commands::execute_list(args, &registry, &formatter)?,
                Command::Fingerprints => commands::execute_fingerprints(&registry, &formatter)?,
                Command::Count => commands::execute_count(&registry, &formatter)?,
                Command::ByCreator(args) => {
                    commands::execute_by_creator(args, &registry, &formatter)?
                }
                Command::Profile(_) => unreachable!(),
            }
        }
    };

    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}
