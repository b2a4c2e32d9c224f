//! End-to-end command tests against a file-backed registry

use clap::Parser;
use origin_cli::cli::{ProfileAction, ProfileArgs};
use origin_cli::commands;
use origin_cli::config::{Config, OutputFormat};
use origin_cli::{Cli, CliError, Command, Formatter};
use origin_domain::ContentFingerprint;
use origin_store::RegistryError;
use tempfile::TempDir;

fn hex(byte: u8) -> String {
    ContentFingerprint::from_bytes([byte; 64]).to_hex()
}

fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["origin"];
    argv.extend_from_slice(args);
    Cli::parse_from(argv).command
}

fn json() -> Formatter {
    Formatter::new(OutputFormat::Json, false)
}

fn quiet() -> Formatter {
    Formatter::new(OutputFormat::Quiet, false)
}

fn anchor(registry: &origin_store::Registry, byte: u8, creator: &str) -> String {
    match parse(&["anchor", &hex(byte), "--locator", "cid", "--organization", "AP"]) {
        Command::Anchor(args) => {
            commands::execute_anchor(args, registry, Some(creator), &quiet()).unwrap()
        }
        _ => panic!("Expected Anchor command"),
    }
}

#[test]
fn test_anchor_then_verify() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("data").join("anchors.db");
    let registry = commands::open_registry(db.to_str().unwrap()).unwrap();

    let record_id = anchor(&registry, 0xAA, "alice");

    let Command::Verify(args) = parse(&["verify", &hex(0xAA)]) else {
        panic!("Expected Verify command");
    };
    let output = commands::execute_verify(args, &registry, &json()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["anchored"], true);
    assert_eq!(value["record"]["record_id"], record_id.as_str());
    assert_eq!(value["record"]["creator"], "alice");

    let Command::Verify(args) = parse(&["verify", &hex(0xBB)]) else {
        panic!("Expected Verify command");
    };
    let output = commands::execute_verify(args, &registry, &quiet()).unwrap();
    assert_eq!(output, "not anchored");
}

#[test]
fn test_duplicate_anchor_is_an_error() {
    let dir = TempDir::new().unwrap();
    let registry = commands::open_registry(dir.path().join("a.db").to_str().unwrap()).unwrap();
    anchor(&registry, 1, "alice");

    let Command::Anchor(args) = parse(&["anchor", &hex(1), "--locator", "other"]) else {
        panic!("Expected Anchor command");
    };
    let result = commands::execute_anchor(args, &registry, Some("bob"), &quiet());
    assert!(matches!(
        result,
        Err(CliError::Registry(RegistryError::DuplicateFingerprint(_)))
    ));
    assert_eq!(registry.count(), 1);
}

#[test]
fn test_anchor_requires_creator() {
    let dir = TempDir::new().unwrap();
    let registry = commands::open_registry(dir.path().join("a.db").to_str().unwrap()).unwrap();

    let Command::Anchor(args) = parse(&["anchor", &hex(1), "--locator", "cid"]) else {
        panic!("Expected Anchor command");
    };
    let result = commands::execute_anchor(args, &registry, None, &quiet());
    assert!(matches!(result, Err(CliError::InvalidInput(_))));
    assert_eq!(registry.count(), 0);
}

#[test]
fn test_derive_and_show_lineage() {
    let dir = TempDir::new().unwrap();
    let registry = commands::open_registry(dir.path().join("a.db").to_str().unwrap()).unwrap();
    let original_id = anchor(&registry, 1, "alice");

    let Command::Derive(args) = parse(&[
        "derive",
        &hex(1),
        &hex(2),
        "--locator",
        "cid-2",
        "--edit",
        "cropped 20%",
        "--creator",
        "bob",
    ]) else {
        panic!("Expected Derive command");
    };
    commands::execute_derive(args, &registry, None, &quiet()).unwrap();

    let Command::ShowLineage(args) = parse(&["show-lineage", &hex(2)]) else {
        panic!("Expected ShowLineage command");
    };
    let output = commands::execute_show_lineage(args, &registry, &json()).unwrap();
    let chain: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0]["edit_type"], "cropped 20%");
    assert_eq!(chain[0]["organization_tag"], "AP");
    assert_eq!(chain[0]["parent_id"], original_id.as_str());
    assert_eq!(chain[1]["is_original"], true);
}

#[test]
fn test_derive_from_unknown_parent() {
    let dir = TempDir::new().unwrap();
    let registry = commands::open_registry(dir.path().join("a.db").to_str().unwrap()).unwrap();

    let Command::Derive(args) = parse(&[
        "derive", &hex(1), &hex(2), "--locator", "cid", "--edit", "cropped",
    ]) else {
        panic!("Expected Derive command");
    };
    let result = commands::execute_derive(args, &registry, Some("alice"), &quiet());
    assert!(matches!(result, Err(CliError::Registry(RegistryError::NotFound(_)))));
    assert_eq!(registry.count(), 0);
}

#[test]
fn test_listing_commands_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("a.db");
    {
        let registry = commands::open_registry(db.to_str().unwrap()).unwrap();
        anchor(&registry, 3, "alice");
        anchor(&registry, 1, "bob");
        anchor(&registry, 2, "alice");
    }

    let registry = commands::open_registry(db.to_str().unwrap()).unwrap();
    assert_eq!(commands::execute_count(&registry, &quiet()).unwrap(), "3");

    let output = commands::execute_fingerprints(&registry, &quiet()).unwrap();
    assert_eq!(output, [hex(3), hex(1), hex(2)].join("\n"));

    let Command::List(args) = parse(&["list", "--start", "1", "--limit", "1"]) else {
        panic!("Expected List command");
    };
    assert_eq!(commands::execute_list(args, &registry, &quiet()).unwrap(), hex(1));

    let Command::ByCreator(args) = parse(&["by-creator", "alice"]) else {
        panic!("Expected ByCreator command");
    };
    let output = commands::execute_by_creator(args, &registry, &quiet()).unwrap();
    assert_eq!(output, [hex(3), hex(2)].join("\n"));
}

#[test]
fn test_list_rejects_negative_start() {
    let dir = TempDir::new().unwrap();
    let registry = commands::open_registry(dir.path().join("a.db").to_str().unwrap()).unwrap();

    let Command::List(args) = parse(&["list", "--start", "-1"]) else {
        panic!("Expected List command");
    };
    let result = commands::execute_list(args, &registry, &quiet());
    assert!(matches!(
        result,
        Err(CliError::Registry(RegistryError::InvalidRange { .. }))
    ));
}

#[test]
fn test_profile_commands_persist() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    let mut config = Config::default();
    let formatter = Formatter::new(OutputFormat::Table, false);

    let set = ProfileArgs {
        action: ProfileAction::Set {
            name: "newsroom".to_string(),
            path: "newsroom.db".to_string(),
            creator: Some("alice".to_string()),
        },
    };
    let output = commands::execute_profile(set, &mut config, &config_path, &formatter).unwrap();
    assert_eq!(output, "✓ Created profile 'newsroom'");

    let switch = ProfileArgs {
        action: ProfileAction::Switch {
            name: "newsroom".to_string(),
        },
    };
    commands::execute_profile(switch, &mut config, &config_path, &formatter).unwrap();

    let reloaded = Config::load_from(&config_path).unwrap();
    assert_eq!(reloaded.active_profile, "newsroom");
    assert_eq!(
        reloaded.get_active_profile().unwrap().creator.as_deref(),
        Some("alice")
    );

    let show = ProfileArgs {
        action: ProfileAction::Show,
    };
    let output = commands::execute_profile(show, &mut config, &config_path, &formatter).unwrap();
    assert!(output.contains("Database: newsroom.db"));

    let delete_active = ProfileArgs {
        action: ProfileAction::Delete {
            name: "newsroom".to_string(),
        },
    };
    let result = commands::execute_profile(delete_active, &mut config, &config_path, &formatter);
    assert!(matches!(result, Err(CliError::Config(_))));
}
