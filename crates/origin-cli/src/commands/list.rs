//! Listing command implementations.

use crate::cli::{ByCreatorArgs, ListArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use origin_domain::CreatorId;
use origin_store::Registry;

/// Execute the list command.
pub fn execute_list(args: ListArgs, registry: &Registry, formatter: &Formatter) -> Result<String> {
    let page = registry.paginate(args.start, args.limit)?;
    formatter.format_records(&page)
}

/// Execute the fingerprints command.
pub fn execute_fingerprints(registry: &Registry, formatter: &Formatter) -> Result<String> {
    formatter.fingerprints(&registry.list_all_fingerprints())
}

/// Execute the count command.
pub fn execute_count(registry: &Registry, formatter: &Formatter) -> Result<String> {
    formatter.count(registry.count())
}

/// Execute the by-creator command.
pub fn execute_by_creator(
    args: ByCreatorArgs,
    registry: &Registry,
    formatter: &Formatter,
) -> Result<String> {
    let creator = CreatorId::new(args.creator).map_err(CliError::InvalidInput)?;
    formatter.format_records(&registry.list_by_creator(&creator))
}
