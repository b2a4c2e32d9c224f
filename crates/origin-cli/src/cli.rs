//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use origin_domain::ContentFingerprint;

/// Origin CLI - Anchor and verify content fingerprints.
#[derive(Debug, Parser)]
#[command(name = "origin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ORIGIN_CONFIG")]
    pub config: Option<String>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Registry database file, overriding the profile's
    #[arg(short, long, global = true, env = "ORIGIN_DATABASE")]
    pub database: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (identifiers only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Anchor an original capture
    Anchor(AnchorArgs),

    /// Anchor an edit of an already anchored record
    Derive(DeriveArgs),

    /// Check whether a fingerprint is anchored
    Verify(VerifyArgs),

    /// Show the edit chain from a record back to its original
    ShowLineage(LineageArgs),

    /// List records in insertion order
    List(ListArgs),

    /// Print every anchored fingerprint
    Fingerprints,

    /// Print the number of anchored records
    Count,

    /// List records submitted by one creator
    ByCreator(ByCreatorArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Arguments for the anchor command.
#[derive(Debug, Parser)]
pub struct AnchorArgs {
    /// Content fingerprint (128 hex characters)
    pub fingerprint: ContentFingerprint,

    /// Storage locator for the content bytes
    #[arg(short = 's', long)]
    pub locator: String,

    /// Capture location tag
    #[arg(short, long, default_value = "")]
    pub location: String,

    /// Organization tag
    #[arg(short, long, default_value = "")]
    pub organization: String,

    /// Creator identity (defaults to the profile's creator)
    #[arg(long)]
    pub creator: Option<String>,
}

/// Arguments for the derive command.
#[derive(Debug, Parser)]
pub struct DeriveArgs {
    /// Fingerprint of the parent record
    pub parent: ContentFingerprint,

    /// Fingerprint of the edited content
    pub fingerprint: ContentFingerprint,

    /// Storage locator for the edited bytes
    #[arg(short = 's', long)]
    pub locator: String,

    /// What was done to the parent (e.g. "cropped 20%")
    #[arg(short, long)]
    pub edit: String,

    /// Location tag (defaults to the parent's)
    #[arg(short, long)]
    pub location: Option<String>,

    /// Organization tag (defaults to the parent's)
    #[arg(short, long)]
    pub organization: Option<String>,

    /// Creator identity (defaults to the profile's creator)
    #[arg(long)]
    pub creator: Option<String>,
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Fingerprint to verify
    pub fingerprint: ContentFingerprint,
}

/// Arguments for the show-lineage command.
#[derive(Debug, Parser)]
pub struct LineageArgs {
    /// Fingerprint whose ancestry to show
    pub fingerprint: ContentFingerprint,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Zero-based position of the first record
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub start: i64,

    /// Maximum number of records
    #[arg(short = 'n', long, default_value = "50", allow_negative_numbers = true)]
    pub limit: i64,
}

/// Arguments for the by-creator command.
#[derive(Debug, Parser)]
pub struct ByCreatorArgs {
    /// Creator identity
    pub creator: String,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Registry database file
        #[arg(long)]
        path: String,
        /// Default creator identity
        #[arg(long)]
        creator: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
