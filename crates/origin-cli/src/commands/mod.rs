//! Command implementations.
//!
//! Each command returns the text to print so callers decide where it goes.

pub mod anchor;
pub mod derive;
pub mod list;
pub mod profile;
pub mod verify;

pub use self::anchor::execute_anchor;
pub use self::derive::execute_derive;
pub use self::list::{execute_by_creator, execute_count, execute_fingerprints, execute_list};
pub use self::profile::execute_profile;
pub use self::verify::{execute_show_lineage, execute_verify};

use crate::error::{CliError, Result};
use origin_domain::CreatorId;
use origin_store::{Registry, RegistryConfig};
use std::fs;
use std::path::Path;

/// Open the registry at `database_path`, creating its directory if needed.
pub fn open_registry(database_path: &str) -> Result<Registry> {
    if let Some(parent) = Path::new(database_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(Registry::open(database_path, RegistryConfig::default())?)
}

/// Pick the creator from the flag, falling back to the profile default.
pub(crate) fn resolve_creator(flag: Option<String>, default: Option<&str>) -> Result<CreatorId> {
    let value = flag
        .or_else(|| default.map(str::to_string))
        .ok_or_else(|| {
            CliError::InvalidInput("No creator given; pass --creator or set one on the profile".into())
        })?;
    CreatorId::new(value).map_err(CliError::InvalidInput)
}
