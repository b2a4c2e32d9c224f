//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, Profile};
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the profile command, saving changes to `config_path`.
pub fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<String> {
    match args.action {
        ProfileAction::List => Ok(list_profiles(config, formatter)),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, config_path, name, formatter),
        ProfileAction::Set {
            name,
            path,
            creator,
        } => set_profile(config, config_path, name, path, creator, formatter),
        ProfileAction::Delete { name } => delete_profile(config, config_path, name, formatter),
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> String {
    if config.profiles.is_empty() {
        return formatter.info("No profiles configured");
    }

    let mut names: Vec<&String> = config.profiles.keys().collect();
    names.sort();

    let mut lines = vec!["Available profiles:".to_string()];
    for name in names {
        let profile = &config.profiles[name];
        if name == &config.active_profile {
            lines.push(format!("* {}", formatter.success(name)));
        } else {
            lines.push(format!("  {}", name));
        }
        lines.extend(describe(profile, "    "));
    }

    lines.join("\n")
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<String> {
    let profile = config.get_active_profile()?;

    let mut lines = vec![format!(
        "Active profile: {}",
        formatter.success(&config.active_profile)
    )];
    lines.extend(describe(profile, "  "));
    Ok(lines.join("\n"))
}

fn describe(profile: &Profile, indent: &str) -> Vec<String> {
    let mut lines = vec![format!("{}Database: {}", indent, profile.database_path)];
    if let Some(creator) = &profile.creator {
        lines.push(format!("{}Creator: {}", indent, creator));
    }
    lines
}

/// Switch to a different profile.
fn switch_profile(
    config: &mut Config,
    config_path: &Path,
    name: String,
    formatter: &Formatter,
) -> Result<String> {
    config.switch_profile(name.clone())?;
    config.save_to(config_path)?;
    Ok(formatter.success(&format!("Switched to profile '{}'", name)))
}

/// Create or update a profile.
fn set_profile(
    config: &mut Config,
    config_path: &Path,
    name: String,
    database_path: String,
    creator: Option<String>,
    formatter: &Formatter,
) -> Result<String> {
    let profile = Profile {
        database_path,
        creator,
    };

    let action = if config.profiles.contains_key(&name) {
        "Updated"
    } else {
        "Created"
    };

    config.set_profile(name.clone(), profile);
    config.save_to(config_path)?;

    Ok(formatter.success(&format!("{} profile '{}'", action, name)))
}

/// Delete a profile.
fn delete_profile(
    config: &mut Config,
    config_path: &Path,
    name: String,
    formatter: &Formatter,
) -> Result<String> {
    config.delete_profile(&name)?;
    config.save_to(config_path)?;
    Ok(formatter.success(&format!("Deleted profile '{}'", name)))
}
